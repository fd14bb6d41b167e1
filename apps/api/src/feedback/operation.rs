use std::fmt;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::errors::AppError;
use crate::feedback::prompts::{
    ANALYZE_SYSTEM, ENHANCE_BULLETS_SYSTEM, JOB_MATCH_SYSTEM, REWRITE_SYSTEM,
};
use crate::llm_client::{generate_object, StructuredModel, StructuredRequest};

/// The four model-backed operations. Each carries a fixed profile:
/// system prompt, sampling temperature, output token budget and the
/// message shown to the user when the call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Analyze,
    EnhanceBullets,
    RewriteResume,
    JobMatch,
}

impl Operation {
    pub fn system_prompt(self) -> &'static str {
        match self {
            Operation::Analyze => ANALYZE_SYSTEM,
            Operation::EnhanceBullets => ENHANCE_BULLETS_SYSTEM,
            Operation::RewriteResume => REWRITE_SYSTEM,
            Operation::JobMatch => JOB_MATCH_SYSTEM,
        }
    }

    /// Low for scoring, slightly higher for rewriting.
    pub fn temperature(self) -> f32 {
        match self {
            Operation::Analyze | Operation::JobMatch => 0.3,
            Operation::EnhanceBullets | Operation::RewriteResume => 0.4,
        }
    }

    pub fn max_tokens(self) -> u32 {
        match self {
            Operation::Analyze | Operation::JobMatch => 4000,
            Operation::EnhanceBullets => 3000,
            Operation::RewriteResume => 5000,
        }
    }

    /// Name of the output schema sent to the model.
    pub fn schema_name(self) -> &'static str {
        match self {
            Operation::Analyze => "resume_analysis",
            Operation::EnhanceBullets => "enhance_bullets",
            Operation::RewriteResume => "full_rewrite",
            Operation::JobMatch => "job_match",
        }
    }

    /// User-facing message for any failure after validation. Never includes the cause.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Analyze => {
                "Failed to analyze resume. Please check your API key and try again."
            }
            Operation::EnhanceBullets | Operation::RewriteResume => {
                "Failed to enhance resume. Please check your API key and try again."
            }
            Operation::JobMatch => {
                "Failed to match resume to job. Please check your API key and try again."
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_name())
    }
}

/// Sends one schema-constrained request for `operation` and returns the typed result.
/// Any model failure becomes `AppError::Generation`; there is no retry.
pub async fn run_operation<T>(
    model: &dyn StructuredModel,
    operation: Operation,
    user_message: String,
) -> Result<T, AppError>
where
    T: DeserializeOwned + JsonSchema,
{
    let request = StructuredRequest::for_schema::<T>(
        operation.schema_name(),
        operation.system_prompt(),
        user_message,
        operation.temperature(),
        operation.max_tokens(),
    );

    info!(
        "Running {} on {} (prompt chars: {})",
        operation,
        model.model_name(),
        request.user.chars().count()
    );

    generate_object(model, request)
        .await
        .map_err(|source| AppError::Generation { operation, source })
}
