//! Error types for the Informe server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::engine::EngineError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid payload: {0}")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Render failed: {0}")]
    Render(#[from] EngineError),

    #[error("S3 error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("S3 SDK error: {0}")]
    SdkError(String),
}

/// One field-scoped validation issue
#[derive(Debug, Clone, Serialize)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

/// The full set of validation issues for a rejected payload
#[derive(Debug, Clone, Serialize)]
pub struct FieldErrors {
    pub issues: Vec<FieldIssue>,
}

impl FieldErrors {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} field issue(s)", self.issues.len())
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Vec<FieldIssue>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message, issues) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "invalid_payload",
                "Invalid payload".to_string(),
                Some(errors.issues),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            AppError::Render(e) => {
                // Engine failures are fatal for the request only; the caller
                // gets a generic envelope, the detail goes to the log.
                tracing::error!("PDF render failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "render_failed",
                    "PDF render failed".to_string(),
                    None,
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                match e {
                    StorageError::AccessDenied(_) => (
                        StatusCode::FORBIDDEN,
                        "access_denied",
                        "Access denied".to_string(),
                        None,
                    ),
                    StorageError::SdkError(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "storage_error",
                        "Upload failed".to_string(),
                        None,
                    ),
                }
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            issues,
        });

        (status, body).into_response()
    }
}
