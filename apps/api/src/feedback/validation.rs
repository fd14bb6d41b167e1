//! Input gates checked before any model call. Each failure maps to a 400.

use crate::errors::AppError;

/// Minimum trimmed length of resume text.
pub const MIN_RESUME_CHARS: usize = 50;
/// Minimum trimmed length of a job description.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 30;

pub const RESUME_TOO_SHORT: &str =
    "Please provide a valid resume with at least 50 characters of text.";
pub const REWRITE_RESUME_TOO_SHORT: &str =
    "Please provide a valid resume with at least 50 characters.";
pub const JOB_DESCRIPTION_TOO_SHORT: &str =
    "Please provide a valid job description with at least 30 characters.";
pub const NO_BULLETS: &str = "Please provide bullet points to enhance.";
pub const INVALID_MODE: &str = "Invalid mode. Use 'bullets' or 'full'.";

/// Returns `text` if its trimmed length reaches `min_chars`, otherwise a
/// validation error carrying `message`. Length counts Unicode scalar values.
pub fn require_min_chars<'a>(
    text: Option<&'a str>,
    min_chars: usize,
    message: &str,
) -> Result<&'a str, AppError> {
    match text {
        Some(text) if text.trim().chars().count() >= min_chars => Ok(text),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

/// Drops blank entries and fails if nothing is left.
pub fn require_bullets(bullets: Option<&[String]>) -> Result<Vec<&str>, AppError> {
    let kept: Vec<&str> = bullets
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .filter(|b| !b.trim().is_empty())
        .collect();

    if kept.is_empty() {
        return Err(AppError::Validation(NO_BULLETS.to_string()));
    }
    Ok(kept)
}
