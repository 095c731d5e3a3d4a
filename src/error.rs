use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Unified error type returned by every handler. Maps one-to-one onto the
/// 4xx outcomes of the API; anything else collapses to an opaque 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("password too short")]
    PasswordTooShort,

    #[error("invalid email")]
    InvalidEmail,

    #[error("unable to authenticate with provided credentials")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::DuplicateEmail
            | ApiError::PasswordTooShort
            | ApiError::InvalidEmail
            | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Internal detail goes to the log, never to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "internal error");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
