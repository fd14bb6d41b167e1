//! Enhancement: rewrites individual bullet points or the whole resume.

use tracing::info;

use crate::errors::AppError;
use crate::feedback::models::{EnhanceBullets, FullRewrite};
use crate::feedback::operation::{run_operation, Operation};
use crate::feedback::prompts::{
    number_bullets, ENHANCE_BULLETS_PROMPT_TEMPLATE, REWRITE_PROMPT_TEMPLATE,
};
use crate::llm_client::StructuredModel;

/// Enhances non-blank bullet points, numbered in input order.
pub async fn enhance_bullets(
    model: &dyn StructuredModel,
    bullets: &[&str],
) -> Result<EnhanceBullets, AppError> {
    let prompt =
        ENHANCE_BULLETS_PROMPT_TEMPLATE.replace("{numbered_bullets}", &number_bullets(bullets));
    let result: EnhanceBullets = run_operation(model, Operation::EnhanceBullets, prompt).await?;

    info!(
        "Enhanced {} of {} bullets",
        result.enhanced_bullets.len(),
        bullets.len()
    );

    Ok(result)
}

/// Rewrites a validated resume in full.
pub async fn rewrite_resume(
    model: &dyn StructuredModel,
    resume_text: &str,
) -> Result<FullRewrite, AppError> {
    let prompt = REWRITE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    let result: FullRewrite = run_operation(model, Operation::RewriteResume, prompt).await?;

    info!(
        "Resume rewritten: {} chars in, {} chars out, {} changes",
        resume_text.chars().count(),
        result.rewritten_resume.chars().count(),
        result.changes_summary.len()
    );

    Ok(result)
}
