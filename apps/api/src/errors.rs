use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`;
/// every variant renders as the `{ success: false, error, details? }` envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid content type. Expected {expected}")]
    InvalidContentType { expected: &'static str },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No usable content could be extracted from the uploaded files")]
    NoUsableContent,

    #[error("Generation failed: {0}")]
    Generation(#[source] LlmError),
}

/// Failure body shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::InvalidContentType { .. } => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NoUsableContent => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn envelope(&self) -> ErrorEnvelope {
        let (error, details) = match self {
            AppError::Configuration(msg) => (msg.clone(), None),
            AppError::MethodNotAllowed => ("Method not allowed. Use POST".to_string(), None),
            AppError::InvalidContentType { expected } => (
                format!("Invalid content type. Expected {expected}"),
                None,
            ),
            AppError::Validation(msg) => (msg.clone(), None),
            AppError::NoUsableContent => (
                "No usable content could be extracted from the uploaded files. \
                 Please upload clear PDF, JPG, or PNG documents."
                    .to_string(),
                None,
            ),
            AppError::Generation(_) => (
                "Failed to process files with AI".to_string(),
                Some(self.to_string()),
            ),
        };

        ErrorEnvelope {
            success: false,
            error,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Configuration(msg) => tracing::error!("Configuration error: {msg}"),
            AppError::Generation(e) => tracing::error!("Generation error: {e}"),
            other => tracing::debug!("Request rejected: {other}"),
        }

        (status, Json(self.envelope())).into_response()
    }
}
