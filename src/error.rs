use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("URL not found: {0}")]
    UrlNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid short code: {0}")]
    InvalidShortCode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Short code already exists: {0}")]
    ShortCodeExists(String),

    #[error("Short code generation failed after {0} attempts")]
    ShortCodeGenerationFailed(u32),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Environment variable missing: {0}")]
    MissingEnvVar(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Coarse classification of an [`AppError`], independent of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Conflict,
    NotFound,
    Storage,
    Config,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidUrl(_) | AppError::InvalidShortCode(_) | AppError::InvalidRequest(_) => {
                ErrorKind::InvalidInput
            }
            AppError::ShortCodeExists(_) => ErrorKind::Conflict,
            AppError::UrlNotFound(_) => ErrorKind::NotFound,
            AppError::Configuration(_) | AppError::MissingEnvVar(_) => ErrorKind::Config,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Storage(_)
            | AppError::ShortCodeGenerationFailed(_)
            | AppError::Internal(_) => ErrorKind::Storage,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Storage | ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, error_code, hint) = match &self {
            AppError::UrlNotFound(_) => (
                StatusCode::NOT_FOUND,
                "Short URL not found".to_string(),
                "NOT_FOUND",
                Some("Check the URL or create a new one"),
            ),
            AppError::InvalidUrl(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "INVALID_URL", None),
            AppError::InvalidShortCode(msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                "INVALID_CODE",
                Some("Only letters and numbers allowed"),
            ),
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone(), "INVALID_REQUEST", None)
            }
            AppError::ShortCodeExists(_) => (
                StatusCode::CONFLICT,
                "Custom code already in use".to_string(),
                "CODE_EXISTS",
                Some("Try a different code"),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error processing request".to_string(),
                    "DATABASE_ERROR",
                    Some("Please try again"),
                )
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error processing request".to_string(),
                    "DATABASE_ERROR",
                    None,
                )
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error processing request".to_string(),
                    "INTERNAL_ERROR",
                    None,
                )
            }
        };

        let mut body = json!({
            "error": error_code,
            "message": error_message,
        });
        if let Some(hint) = hint {
            body["hint"] = json!(hint);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;
