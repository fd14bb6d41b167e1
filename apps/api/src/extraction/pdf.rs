//! PDF (and unknown type) text extraction.
//!
//! First a real parse with `pdf-extract`. If that yields nothing, fall back to
//! keeping the printable ASCII found in the raw bytes. The fallback is only
//! useful for uncompressed PDFs; for most real files it produces noise or the
//! instructional message below.

use bytes::Bytes;
use tracing::{debug, warn};

/// Returned instead of text when the heuristic finds too little to work with.
pub const PDF_FALLBACK_MESSAGE: &str = "Could not extract text from this PDF. \
Please try a .txt or .docx file, or paste your resume text directly.";

/// The heuristic result must be longer than this to count as extracted text.
const MIN_HEURISTIC_CHARS: usize = 100;

pub async fn extract_pdf_text(bytes: Bytes) -> String {
    if let Some(text) = parse_pdf(bytes.clone()).await {
        return text;
    }
    printable_text(&bytes)
}

/// Runs the PDF parser on the blocking pool. Parse errors and parser panics
/// both mean "no text".
async fn parse_pdf(bytes: Bytes) -> Option<String> {
    let parsed = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
    })
    .await;

    match parsed {
        Ok(Ok(text)) => {
            let text = tidy_lines(&text);
            if text.is_empty() {
                debug!("PDF parsed but contained no text");
                None
            } else {
                Some(text)
            }
        }
        Ok(Err(e)) => {
            debug!("PDF parse failed, using printable-byte heuristic: {e}");
            None
        }
        Err(e) => {
            warn!("PDF parser aborted, using printable-byte heuristic: {e}");
            None
        }
    }
}

/// Replaces everything outside printable ASCII (plus `\n`, `\r`, `\t`) with a
/// space, collapses whitespace runs and trims.
pub fn printable_text(bytes: &[u8]) -> String {
    let printable: String = String::from_utf8_lossy(bytes)
        .chars()
        .map(|c| match c {
            ' '..='~' | '\n' | '\r' | '\t' => c,
            _ => ' ',
        })
        .collect();

    let readable = printable.split_whitespace().collect::<Vec<_>>().join(" ");
    if readable.chars().count() > MIN_HEURISTIC_CHARS {
        readable
    } else {
        PDF_FALLBACK_MESSAGE.to_string()
    }
}

/// Trims every line and drops blank ones.
fn tidy_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_text_at_threshold_is_fallback() {
        let bytes = "x".repeat(MIN_HEURISTIC_CHARS);
        assert_eq!(printable_text(bytes.as_bytes()), PDF_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_printable_text_above_threshold_is_returned() {
        let bytes = "x".repeat(MIN_HEURISTIC_CHARS + 1);
        assert_eq!(printable_text(bytes.as_bytes()), bytes);
    }

    #[test]
    fn test_binary_noise_is_stripped_and_collapsed() {
        let mut bytes = b"%PDF-1.4\n\x00\x01\x02".to_vec();
        bytes.extend_from_slice("Jane   Doe\r\n\tRust Engineer \u{00e9}".as_bytes());
        bytes.extend_from_slice(&[0xff, 0xfe, 0x00]);
        bytes.extend_from_slice(" word".repeat(30).as_bytes());

        let text = printable_text(&bytes);
        assert!(text.starts_with("%PDF-1.4 Jane Doe Rust Engineer word word"));
        assert!(!text.contains("  "));
        assert!(text.is_ascii());
    }

    #[test]
    fn test_only_binary_is_fallback() {
        let bytes: Vec<u8> = (0u8..32).chain(127u8..=255).cycle().take(4096).collect();
        assert_eq!(printable_text(&bytes), PDF_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_tidy_lines_drops_blank_lines() {
        assert_eq!(tidy_lines("  Jane Doe \n\n\n  Engineer\n"), "Jane Doe\nEngineer");
    }

    #[tokio::test]
    async fn test_unparseable_pdf_with_text_uses_heuristic() {
        let body = "Experience Senior Engineer at Acme Corp building payment systems in Rust and Go for eight years straight";
        let bytes = Bytes::from(format!("%PDF-1.7\n\u{0001}{body}\n%%EOF"));
        let text = extract_pdf_text(bytes).await;
        assert!(text.contains(body));
    }
}
