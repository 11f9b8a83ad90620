//! Error handling module for the homepage backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
#[allow(dead_code)]
pub mod codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UNSUPPORTED_FORMAT: &str = "UNSUPPORTED_FORMAT";
    pub const SERVER_MISCONFIGURED: &str = "SERVER_MISCONFIGURED";
    pub const SAVE_FAILED: &str = "SAVE_FAILED";
    pub const UPLOAD_FAILED: &str = "UPLOAD_FAILED";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed body or missing required field
    BadRequest(String),
    /// Missing/invalid/expired token, or wrong password
    Unauthorized(String),
    /// Missing image or unknown resource
    NotFound(String),
    /// Declared image content type outside the allow-list
    UnsupportedFormat(String),
    /// No admin password configured
    ServerMisconfigured(String),
    /// Config write failed in the underlying store
    SaveFailed(String),
    /// Image write failed in the underlying store
    UploadFailed(String),
    /// Any other store error
    Database(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            AppError::ServerMisconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SaveFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UploadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::UnsupportedFormat(_) => codes::UNSUPPORTED_FORMAT,
            AppError::ServerMisconfigured(_) => codes::SERVER_MISCONFIGURED,
            AppError::SaveFailed(_) => codes::SAVE_FAILED,
            AppError::UploadFailed(_) => codes::UPLOAD_FAILED,
            AppError::Database(_) => codes::DATABASE_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::UnsupportedFormat(msg)
            | AppError::ServerMisconfigured(msg)
            | AppError::SaveFailed(msg)
            | AppError::UploadFailed(msg)
            | AppError::Database(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::UnsupportedFormat("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ServerMisconfigured("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_envelope_shape() {
        let err = AppError::SaveFailed("disk full".into());
        let body = ErrorResponse::new(&err);
        assert!(!body.success);
        assert_eq!(body.error.code, "SAVE_FAILED");
        assert_eq!(body.error.message, "disk full");
    }
}
