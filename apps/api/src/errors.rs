use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::feedback::operation::Operation;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every response body is `{"error": "<message>"}`. Only validation messages
/// describe the actual problem; everything else is generic and the cause is logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{operation} failed: {source}")]
    Generation {
        operation: Operation,
        #[source]
        source: LlmError,
    },

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Generation { operation, source } => {
                tracing::error!("{operation} failed: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    operation.failure_message().to_string(),
                )
            }
            AppError::Extraction(e) => {
                tracing::warn!("Extraction error: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Failed to extract text from the uploaded file.".to_string(),
                )
            }
            AppError::Upload(e) => {
                tracing::warn!("Upload error: {e}");
                (e.status(), e.body_text())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
