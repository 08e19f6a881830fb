use serde_json::json;

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};

/// Thin client for an HTTP mail API. Only used by the password-recovery
/// flow; when no API key is configured the code is logged instead of sent so
/// local setups work without an account.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn send_recovery_code(&self, to: &str, code: &str) -> AppResult<()> {
        if self.config.api_url.is_empty() || self.config.api_key.is_empty() {
            log::info!("Mail API not configured; recovery code for {to}: {code}");
            return Ok(());
        }

        let body = json!({
            "from": self.config.from,
            "to": [to],
            "subject": "Password recovery - FarmaVida",
            "text": format!(
                "Your recovery code is: {code}. It expires in 1 hour."
            )
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::MailError(format!(
                "mail API returned {}",
                response.status()
            )));
        }

        log::info!("Recovery code sent to {to}");
        Ok(())
    }
}
