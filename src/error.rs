use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invite code not found")]
    CodeNotFound,
    #[error("Invite code has expired")]
    ExpiredCode,
    #[error("Invite code has already been used")]
    AlreadyUsed,
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    /// Body or query that failed to deserialize; the detail is logged only.
    #[error("Malformed payload: {0}")]
    Payload(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Stable machine-readable kind, part of the public error body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(e) if is_unique_violation(e) => "conflict",
            AppError::Database(_) => "internal",
            AppError::Unauthorized => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) | AppError::CodeNotFound => "not_found",
            AppError::ExpiredCode => "expired_code",
            AppError::AlreadyUsed => "already_used",
            AppError::InvalidState(_) => "invalid_state",
            AppError::Validation(_) | AppError::Payload(_) => "validation_error",
            AppError::Conflict(_) => "conflict",
            AppError::Internal | AppError::InternalWithMsg(_) => "internal",
        }
    }
}

// 2067 = SQLite UNIQUE, 1555 = SQLite PRIMARY KEY, 23505 = PostgreSQL unique_violation
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code == "2067" || code == "1555" || code == "23505")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match &self {
            AppError::Database(e) => {
                if is_unique_violation(e) {
                    (StatusCode::CONFLICT, "Resource already exists (duplicate entry)".to_string())
                } else {
                    error!("Database error: {:?}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
                }
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::CodeNotFound => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::ExpiredCode => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::AlreadyUsed => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidState(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Payload(detail) => {
                warn!("Rejected payload: {}", detail);
                (StatusCode::BAD_REQUEST, "Malformed request payload".to_string())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}
