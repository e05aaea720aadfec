//! Common error types and handling for the timesheet service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the timesheet service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A configuration mutation that did not take effect.
    ///
    /// Reported as a bare 500: the optional message is sent as the plain-text
    /// body so clients can tell rejected input apart from a missing target.
    #[error("Operation failed{}", .0.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Failed(Option<String>),

    /// More records than the at-most-one rule allows.
    #[error("Data integrity fault: {0}")]
    Integrity(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Mutation failure without a body
    pub fn failed() -> Self {
        Error::Failed(None)
    }

    /// Mutation failure carrying a message for the caller
    pub fn failed_with(message: impl Into<String>) -> Self {
        Error::Failed(Some(message.into()))
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::Authorization(_) => StatusCode::FORBIDDEN,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unexpected(_)
            | Error::Database(_)
            | Error::Serialization(_)
            | Error::Failed(_)
            | Error::Integrity(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "UNEXPECTED_ERROR",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Authentication(_) => "AUTHENTICATION_ERROR",
            Error::Authorization(_) => "AUTHORIZATION_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Failed(_) => "OPERATION_FAILED",
            Error::Integrity(_) => "DATA_INTEGRITY_FAULT",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let Error::Failed(message) = self {
            tracing::debug!(message = ?message, "Configuration mutation failed");
            return match message {
                Some(message) => (status, message).into_response(),
                None => status.into_response(),
            };
        }

        // Log internal errors with full context
        if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            tracing::error!(error = %self, "Internal server error");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
