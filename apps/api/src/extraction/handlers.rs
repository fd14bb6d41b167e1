//! Axum route handler for file uploads.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract_text, max_document_bytes, DocumentKind, UploadedFile};
use crate::state::AppState;

/// Multipart field that carries the resume file.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub text: String,
    pub file_name: String,
    pub format: DocumentKind,
    pub character_count: usize,
}

/// POST /api/extract
///
/// Accepts `multipart/form-data` with a `file` part and returns its text.
/// Unreadable PDFs come back as an instructional message, not an error,
/// and will fail the length checks of the feedback endpoints.
pub async fn handle_extract(
    State(state): State<AppState>,
    payload: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut multipart = payload.map_err(|rejection| {
        tracing::debug!("Rejected upload: {}", rejection.body_text());
        AppError::Validation("Please upload a file as multipart/form-data.".to_string())
    })?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        let upload = UploadedFile {
            file_name,
            content_type,
            bytes,
        };
        let format = upload.kind();
        info!(
            "Extracting {:?} upload '{}' ({} bytes)",
            format,
            upload.file_name,
            upload.bytes.len()
        );

        let file_name = upload.file_name.clone();
        let limit = max_document_bytes(state.config.max_upload_bytes);
        let text = extract_text(upload, limit).await?;
        let character_count = text.chars().count();

        return Ok(Json(ExtractResponse {
            text,
            file_name,
            format,
            character_count,
        }));
    }

    Err(AppError::Validation(
        "Please attach a resume file in the 'file' field.".to_string(),
    ))
}
