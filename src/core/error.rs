//! Error type system for the record service
//!
//! This module provides:
//! - A single error enum covering store, auth, validation and system failures
//! - HTTP status code mapping
//! - Plain-text error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Main error type for the service
#[derive(Debug, thiserror::Error)]
pub enum StonksError {
    // System-level errors
    #[error("System initialization failed: {0}")]
    InitializationError(String),

    // Store errors
    #[error("{0}")]
    StoreUnavailable(String),

    // API-related errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Carries a reason for the logs only; the response body never includes it.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    // I/O errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task error: {0}")]
    TaskError(String),
}

impl StonksError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            StonksError::BadRequest(_) => StatusCode::BAD_REQUEST,
            StonksError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            StonksError::NotFound(_) => StatusCode::NOT_FOUND,
            StonksError::Conflict(_) => StatusCode::CONFLICT,

            StonksError::InitializationError(_)
            | StonksError::StoreUnavailable(_)
            | StonksError::Internal(_)
            | StonksError::IoError(_)
            | StonksError::TaskError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name used in logs
    pub fn error_type(&self) -> &'static str {
        match self {
            StonksError::InitializationError(_) => "InitializationError",
            StonksError::StoreUnavailable(_) => "StoreUnavailable",
            StonksError::BadRequest(_) => "BadRequest",
            StonksError::Unauthorized(_) => "Unauthorized",
            StonksError::NotFound(_) => "NotFound",
            StonksError::Conflict(_) => "Conflict",
            StonksError::Internal(_) => "Internal",
            StonksError::IoError(_) => "IoError",
            StonksError::TaskError(_) => "TaskError",
        }
    }

    /// Body text sent to the caller
    ///
    /// Every `Unauthorized` reads the same. The reason only reaches the logs.
    pub fn public_message(&self) -> String {
        match self {
            StonksError::Unauthorized(_) => "Unauthorized".to_string(),
            StonksError::StoreUnavailable(msg) => msg.clone(),
            StonksError::BadRequest(msg)
            | StonksError::NotFound(msg)
            | StonksError::Conflict(msg) => msg.clone(),
            _ => self
                .status_code()
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string(),
        }
    }
}

impl From<rusqlite::Error> for StonksError {
    fn from(err: rusqlite::Error) -> Self {
        StonksError::StoreUnavailable(err.to_string())
    }
}

impl From<r2d2::Error> for StonksError {
    fn from(err: r2d2::Error) -> Self {
        StonksError::StoreUnavailable(err.to_string())
    }
}

/// Implement IntoResponse so handlers can return `Result<_, StonksError>`
impl IntoResponse for StonksError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, self.public_message()).into_response()
    }
}

/// Result type alias for operations that can fail with StonksError
pub type Result<T> = std::result::Result<T, StonksError>;

/// Context extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| StonksError::InitializationError(format!("{}: {}", context.into(), e)))
    }
}
