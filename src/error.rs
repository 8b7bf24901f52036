use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::users::DirectoryError;

/// Application-level error taxonomy, mapped onto HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input. The message is shown to the client.
    #[error("{0}")]
    Validation(String),

    /// Duplicate email on registration.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or a missing/invalid/expired token. The message is
    /// deliberately uniform; the real cause only appears in logs.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Hashing, signing or store failure. Logged with context, surfaced to
    /// the client as a generic 500.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DuplicateEmail => AppError::Conflict("Email already exists".into()),
            DirectoryError::Backend(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Internal(err) => {
                error!(error = ?err, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
