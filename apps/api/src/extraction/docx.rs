//! DOCX reader. A .docx file is a zip archive; the body text lives in
//! `word/document.xml` as `<w:t>` runs grouped into `<w:p>` paragraphs.

use std::io::{self, Cursor, Read};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use zip::result::ZipError;
use zip::ZipArchive;

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Text runs, run-level tabs and breaks, and paragraph ends, in document order.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"<w:t(?:\s[^>]*)?>(?P<text>[^<]*)</w:t>|(?P<tab><w:tab\s*/>)|(?P<brk><w:(?:br|cr)(?:\s[^>]*)?/>)|(?P<para></w:p>)",
        )
        .expect("static DOCX token pattern is valid")
    })
}

fn entity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|lt|gt|amp|quot|apos);")
            .expect("static XML entity pattern is valid")
    })
}

/// Extracts paragraph text from a DOCX archive. Paragraphs are separated by a
/// blank line.
///
/// The document part may inflate to at most `max_document_bytes`. The size
/// declared in the archive is checked first, then the read itself is capped,
/// since the declared size comes from the client.
pub fn extract_docx_text(
    bytes: &[u8],
    max_document_bytes: u64,
) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut part = match archive.by_name(DOCUMENT_PART) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => return Err(ExtractionError::MissingDocumentPart),
        Err(e) => return Err(e.into()),
    };

    let too_large = ExtractionError::DocumentTooLarge {
        limit: max_document_bytes,
    };
    if part.size() > max_document_bytes {
        return Err(too_large);
    }

    let mut raw = Vec::new();
    part.by_ref()
        .take(max_document_bytes.saturating_add(1))
        .read_to_end(&mut raw)?;
    if raw.len() as u64 > max_document_bytes {
        return Err(too_large);
    }

    let xml =
        String::from_utf8(raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(document_xml_to_text(&xml))
}

fn document_xml_to_text(xml: &str) -> String {
    let mut text = String::with_capacity(xml.len() / 4);
    for token in token_pattern().captures_iter(xml) {
        if let Some(run) = token.name("text") {
            text.push_str(&decode_entities(run.as_str()));
        } else if token.name("tab").is_some() {
            text.push('\t');
        } else if token.name("brk").is_some() {
            text.push('\n');
        } else if token.name("para").is_some() {
            text.push_str("\n\n");
        }
    }
    text.trim().to_string()
}

fn decode_entities(raw: &str) -> String {
    entity_pattern()
        .replace_all(raw, |caps: &Captures| {
            let entity = &caps[1];
            match entity {
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "amp" => "&".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                _ => {
                    let code = match entity.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_else(|| caps[0].to_string())
                }
            }
        })
        .into_owned()
}
