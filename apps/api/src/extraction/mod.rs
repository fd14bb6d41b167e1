//! Text extraction: turns an uploaded resume file into plain text.
//!
//! Dispatch: declared `text/plain` passes through, `.docx` goes through the
//! OOXML reader, everything else (PDF and unknown types) through the PDF path.
//! The PDF path ends in a printable-byte heuristic that returns an
//! instructional message instead of failing.

pub mod docx;
pub mod handlers;
pub mod pdf;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("not a readable DOCX archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to read document part: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive has no word/document.xml part")]
    MissingDocumentPart,

    #[error("document part inflates past {limit} bytes")]
    DocumentTooLarge { limit: u64 },
}

/// How many times the upload limit a DOCX document part may inflate to.
const MAX_INFLATION_RATIO: u64 = 10;

/// Largest decompressed document part accepted for a given upload limit.
pub fn max_document_bytes(max_upload_bytes: usize) -> u64 {
    (max_upload_bytes as u64).saturating_mul(MAX_INFLATION_RATIO)
}

/// How an upload is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Docx,
    /// PDF and every unrecognised type.
    Pdf,
}

/// A file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    /// Declared media type, if the client sent one.
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn kind(&self) -> DocumentKind {
        let name = self.file_name.to_ascii_lowercase();
        match self.media_type() {
            Some(media_type) if media_type.eq_ignore_ascii_case("text/plain") => {
                DocumentKind::Text
            }
            None if name.ends_with(".txt") => DocumentKind::Text,
            _ if name.ends_with(".docx") => DocumentKind::Docx,
            _ => DocumentKind::Pdf,
        }
    }

    /// Media type essence without parameters such as `charset`.
    fn media_type(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
    }
}

/// Best-effort plain text for an upload. Only a broken or oversized DOCX is an
/// error.
pub async fn extract_text(
    file: UploadedFile,
    max_document_bytes: u64,
) -> Result<String, ExtractionError> {
    match file.kind() {
        DocumentKind::Text => Ok(String::from_utf8_lossy(&file.bytes).into_owned()),
        DocumentKind::Docx => docx::extract_docx_text(&file.bytes, max_document_bytes),
        DocumentKind::Pdf => Ok(pdf::extract_pdf_text(file.bytes).await),
    }
}
