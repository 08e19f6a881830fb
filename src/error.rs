use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Insufficient stock for {product_name}: {available} available, {requested} requested")]
    InsufficientStock {
        product_name: String,
        available: i64,
        requested: i64,
    },

    /// The store-level non-negative-stock guard fired, which means the
    /// logical stock check was bypassed by a concurrent order.
    #[error("Stock constraint violated: {0}")]
    StockConstraint(String),

    #[error("Transaction timed out")]
    Timeout,

    #[error("Mail delivery error: {0}")]
    MailError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        // The stock error has a fixed shape the storefront matches on.
        if let AppError::InsufficientStock {
            product_name,
            available,
            requested,
        } = self
        {
            log::warn!("Stock rejected: {product_name} has {available}, requested {requested}");
            return HttpResponse::BadRequest().json(json!({
                "errorType": "STOCK_ERROR",
                "productName": product_name,
                "available": available,
                "requested": requested
            }));
        }

        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                (
                    actix_web::http::StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::Forbidden => {
                log::warn!("Forbidden access");
                (
                    actix_web::http::StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    "Forbidden".to_string(),
                )
            }
            AppError::StockConstraint(msg) => {
                log::error!("Stock constraint violation: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "STOCK_CONSTRAINT",
                    "Negative stock blocked by the store".to_string(),
                )
            }
            AppError::Timeout => {
                log::warn!("Order transaction timed out");
                (
                    actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                    "TIMEOUT",
                    "Transaction timed out, please retry".to_string(),
                )
            }
            AppError::MailError(msg) => {
                log::error!("Mail delivery error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "MAIL_ERROR",
                    "Could not deliver the email".to_string(),
                )
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            AppError::MigrateError(err) => {
                log::error!("Migration error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "MIGRATION_ERROR",
                    "Migration error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

/// True when a sqlx error is a UNIQUE violation on the given column.
pub fn is_unique_violation(err: &sqlx::Error, column: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            db.message().contains("UNIQUE constraint failed") && db.message().contains(column)
        }
        _ => false,
    }
}

/// True when a sqlx error is a CHECK constraint violation.
pub fn is_check_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.message().contains("CHECK constraint failed"),
        _ => false,
    }
}
