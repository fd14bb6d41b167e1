//! Job match: compares a resume with a job description, producing a match score,
//! keyword overlap, gap analysis and tailoring suggestions.

use tracing::info;

use crate::errors::AppError;
use crate::feedback::models::JobMatch;
use crate::feedback::operation::{run_operation, Operation};
use crate::feedback::prompts::job_match_prompt;
use crate::llm_client::StructuredModel;

pub async fn match_job(
    model: &dyn StructuredModel,
    resume_text: &str,
    job_description: &str,
) -> Result<JobMatch, AppError> {
    let prompt = job_match_prompt(resume_text, job_description);
    let result: JobMatch = run_operation(model, Operation::JobMatch, prompt).await?;

    info!(
        "Job matched: score={}/100, matched={}, missing={}, gaps={}",
        result.match_score,
        result.matched_keywords.len(),
        result.missing_keywords.len(),
        result.gap_analysis.len()
    );

    Ok(result)
}
