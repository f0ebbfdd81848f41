use std::any::Any;

use axum::{
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The external script exited unsuccessfully. `status` is `None` when it
    /// was killed by a signal.
    #[error("Script exited with status {status:?}")]
    Process { status: Option<i32>, stderr: String },

    #[error("Could not parse script output: {0}")]
    Parse(String),

    /// The script exited cleanly but reported an `error` field.
    #[error("Script reported an error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
                None,
            ),
            AppError::Process { stderr, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PROCESS_ERROR",
                "Error processing data.".to_string(),
                Some(stderr.clone()),
            ),
            AppError::Parse(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PARSE_ERROR",
                "Failed to parse analysis output".to_string(),
                Some("The analysis script did not return a valid result".to_string()),
            ),
            AppError::Upstream(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_ERROR",
                "The analysis script reported an error".to_string(),
                Some(detail.clone()),
            ),
            AppError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
                Some(format!("{e:#}")),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(_) | AppError::PayloadTooLarge(_) => {}
            AppError::Process { status, stderr } => {
                tracing::error!("Script failed (status {status:?}): {stderr}");
            }
            AppError::Parse(msg) => tracing::error!("Script output parse error: {msg}"),
            AppError::Upstream(detail) => tracing::error!("Script reported error: {detail}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        let (status, code, message, details) = self.parts();
        let body = Json(json!({
            "error": message,
            "code": code,
            "details": details,
        }));

        (status, body).into_response()
    }
}

/// A request that could not be opened as `multipart/form-data` at all.
impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        let message = format!("Expected a multipart form: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else {
            AppError::Validation(message)
        }
    }
}

/// Response for a panicking handler, installed via `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal(anyhow::anyhow!("request handler panicked: {message}")).into_response()
}
