use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::external::Mailer;
use crate::models::*;
use crate::utils::{generate_six_digit_code, hash_password, verify_password, JwtService};

const USER_COLUMNS: &str = "id, name, email, password, role, status, phone, location, \
                            img_url, reset_code, reset_expires, created_at";

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    jwt_service: JwtService,
    mailer: Mailer,
}

impl AuthService {
    pub fn new(pool: SqlitePool, jwt_service: JwtService, mailer: Mailer) -> Self {
        Self {
            pool,
            jwt_service,
            mailer,
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> AppResult<()> {
        let existing = self.find_by_email(&request.email).await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(
                "email is already registered".to_string(),
            ));
        }

        let hashed = hash_password(&request.password)?;

        sqlx::query(
            "INSERT INTO users (name, email, password, role, phone, location, status) \
             VALUES (?, ?, ?, 'Cliente', ?, ?, 'active')",
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&hashed)
        .bind(&request.phone)
        .bind(&request.location)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        let user = self
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

        if user.status != "active" {
            return Err(AppError::Forbidden);
        }

        if !verify_password(&request.password, &user.password)? {
            return Err(AppError::AuthError("Invalid credentials".to_string()));
        }

        let token = self
            .jwt_service
            .generate_token(user.id, &user.role, &user.name)?;

        Ok(LoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    /// Store a 6-digit recovery code with a one-hour expiry and mail it.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("No account with that email".to_string()))?;

        let code = generate_six_digit_code();
        let expires = Utc::now() + Duration::hours(1);

        sqlx::query("UPDATE users SET reset_code = ?, reset_expires = ? WHERE id = ?")
            .bind(&code)
            .bind(expires)
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        self.mailer.send_recovery_code(email, &code).await?;

        Ok(())
    }

    pub async fn verify_code(&self, email: &str, code: &str) -> AppResult<()> {
        self.find_by_valid_code(email, code).await?;
        Ok(())
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> AppResult<()> {
        let user = self.find_by_valid_code(&request.email, &request.code).await?;

        let hashed = hash_password(&request.new_password)?;

        sqlx::query(
            "UPDATE users SET password = ?, reset_code = NULL, reset_expires = NULL WHERE id = ?",
        )
        .bind(&hashed)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    async fn find_by_valid_code(&self, email: &str, code: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE email = ? AND reset_code = ? AND reset_expires > ?"
        ))
        .bind(email)
        .bind(code)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::ValidationError("Invalid or expired code".to_string()))
    }
}
