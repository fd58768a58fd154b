use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token signing error: {0}")]
    Token(String),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Language model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Language model unavailable: {0}")]
    Upstream(String),

    #[error("Missing or invalid identity token")]
    Unauthenticated,

    #[error("Email or password is incorrect")]
    InvalidCredentials,

    #[error("Admin role required")]
    Forbidden,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Subscription not found")]
    SubscriptionNotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Migration(ref e) => {
                tracing::error!("Migration error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::PasswordHash(ref e) => {
                tracing::error!("Password hashing error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Token(ref e) => {
                tracing::error!("Token signing error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::TaskJoin(ref e) => {
                tracing::error!("Task join error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Http(ref e) => {
                tracing::error!("Language model request failed: {:?}", e);
                (StatusCode::BAD_GATEWAY, "Language model request failed".to_string())
            }
            AppError::Upstream(ref msg) => {
                tracing::error!("Language model unavailable: {}", msg);
                (StatusCode::BAD_GATEWAY, "Language model unavailable".to_string())
            }
            AppError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Missing or invalid identity token".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Email or password is incorrect".to_string())
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Admin role required".to_string()),
            AppError::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists".to_string()),
            AppError::SubscriptionNotFound => (StatusCode::NOT_FOUND, "Subscription not found".to_string()),
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidBody(ref rejection) => {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, rejection.body_text())
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
