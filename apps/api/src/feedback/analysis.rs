//! Resume analysis: overall score, strengths, weaknesses, section scores,
//! keyword coverage and prioritized improvements.

use tracing::info;

use crate::errors::AppError;
use crate::feedback::models::ResumeAnalysis;
use crate::feedback::operation::{run_operation, Operation};
use crate::feedback::prompts::ANALYZE_PROMPT_TEMPLATE;
use crate::llm_client::StructuredModel;

/// Analyzes validated resume text.
pub async fn analyze_resume(
    model: &dyn StructuredModel,
    resume_text: &str,
) -> Result<ResumeAnalysis, AppError> {
    let prompt = ANALYZE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    let analysis: ResumeAnalysis = run_operation(model, Operation::Analyze, prompt).await?;

    info!(
        "Resume analyzed: score={}/100, sections={}, improvements={}",
        analysis.overall_score,
        analysis.sections.len(),
        analysis.improvements.len()
    );

    Ok(analysis)
}
