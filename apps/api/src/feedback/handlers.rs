//! Axum route handlers for the feedback API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::feedback::analysis::analyze_resume;
use crate::feedback::enhance::{enhance_bullets, rewrite_resume};
use crate::feedback::job_match::match_job;
use crate::feedback::models::{EnhanceBullets, FullRewrite, JobMatch, ResumeAnalysis};
use crate::feedback::validation::{
    require_bullets, require_min_chars, INVALID_MODE, JOB_DESCRIPTION_TOO_SHORT,
    MIN_JOB_DESCRIPTION_CHARS, MIN_RESUME_CHARS, RESUME_TOO_SHORT, REWRITE_RESUME_TOO_SHORT,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

// Fields of the wrong JSON type deserialize as `None` so that they fail
// validation with the same message as a missing field.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub resume_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: ResumeAnalysis,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub resume_text: Option<String>,
    #[serde(default, deserialize_with = "strings_or_none")]
    pub bullet_points: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EnhanceResult {
    Bullets(EnhanceBullets),
    Rewrite(FullRewrite),
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub result: EnhanceResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub resume_text: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchResponse {
    #[serde(rename = "match")]
    pub job_match: JobMatch,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Keeps only the string entries of an array; anything else is `None`.
fn strings_or_none<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

fn malformed_body(rejection: JsonRejection) -> AppError {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    AppError::Validation("Request body must be a valid JSON object.".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Scores a resume and returns itemized feedback.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload.map_err(malformed_body)?;

    let resume_text = require_min_chars(
        request.resume_text.as_deref(),
        MIN_RESUME_CHARS,
        RESUME_TOO_SHORT,
    )?;

    let analysis = analyze_resume(state.model.as_ref(), resume_text).await?;

    Ok(Json(AnalyzeResponse { analysis }))
}

/// POST /api/enhance
///
/// `mode = "bullets"` enhances individual bullet points;
/// `mode = "full"` rewrites the whole resume. Any other mode is rejected first.
pub async fn handle_enhance(
    State(state): State<AppState>,
    payload: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Json<EnhanceResponse>, AppError> {
    let Json(request) = payload.map_err(malformed_body)?;

    let result = match request.mode.as_deref() {
        Some("bullets") => {
            let bullets = require_bullets(request.bullet_points.as_deref())?;
            EnhanceResult::Bullets(enhance_bullets(state.model.as_ref(), &bullets).await?)
        }
        Some("full") => {
            let resume_text = require_min_chars(
                request.resume_text.as_deref(),
                MIN_RESUME_CHARS,
                REWRITE_RESUME_TOO_SHORT,
            )?;
            EnhanceResult::Rewrite(rewrite_resume(state.model.as_ref(), resume_text).await?)
        }
        _ => return Err(AppError::Validation(INVALID_MODE.to_string())),
    };

    Ok(Json(EnhanceResponse { result }))
}

/// POST /api/job-match
///
/// Compares a resume with a job description. The resume is validated first.
pub async fn handle_job_match(
    State(state): State<AppState>,
    payload: Result<Json<JobMatchRequest>, JsonRejection>,
) -> Result<Json<JobMatchResponse>, AppError> {
    let Json(request) = payload.map_err(malformed_body)?;

    let resume_text = require_min_chars(
        request.resume_text.as_deref(),
        MIN_RESUME_CHARS,
        RESUME_TOO_SHORT,
    )?;
    let job_description = require_min_chars(
        request.job_description.as_deref(),
        MIN_JOB_DESCRIPTION_CHARS,
        JOB_DESCRIPTION_TOO_SHORT,
    )?;

    let job_match = match_job(state.model.as_ref(), resume_text, job_description).await?;

    Ok(Json(JobMatchResponse { job_match }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::feedback::validation::NO_BULLETS;
    use crate::llm_client::fake::FakeModel;
    use crate::routes::testing::{post_json, post_raw, test_app};

    use super::*;

    const RESUME: &str = "Jane Doe, Senior Software Engineer. Led a team of 6 building \
        payment infrastructure in Rust; cut settlement latency by 40%.";
    const JOB: &str = "Staff Rust engineer to own our distributed payments platform.";

    fn analysis_fixture() -> Value {
        json!({
            "overallScore": 78,
            "summary": "A focused engineering resume with quantified impact.",
            "pros": ["Quantified results", "Clear role titles", "Relevant stack", "Concise"],
            "cons": ["No summary", "Sparse skills", "Dense bullets", "No links"],
            "sections": [
                {"name": "Formatting", "score": 82, "feedback": ["Consistent layout"]},
                {"name": "Content Quality", "score": 75, "feedback": ["Add scope"]},
                {"name": "ATS Compatibility", "score": 70, "feedback": ["Add keywords", "Use standard headings"]},
                {"name": "Impact & Achievements", "score": 88, "feedback": ["Strong metrics"]},
                {"name": "Readability", "score": 120, "feedback": ["Short sentences"]}
            ],
            "keywords": {"found": ["Rust", "payments"], "missing": ["Kubernetes"]},
            "improvements": [
                {"priority": "high", "title": "Add a summary", "description": "Open with a two-line profile."},
                {"priority": "low", "title": "Add links", "description": "Link GitHub."}
            ]
        })
    }

    fn job_match_fixture() -> Value {
        json!({
            "matchScore": 81,
            "matchSummary": "Strong overlap on Rust and payments.",
            "matchedKeywords": ["Rust", "payments"],
            "missingKeywords": ["distributed systems"],
            "gapAnalysis": [
                {"area": "Distributed systems", "gap": "Not mentioned", "suggestion": "Describe cluster work"}
            ],
            "tailoredSuggestions": ["Lead with payments work"],
            "strengthsForRole": ["Rust depth"]
        })
    }

    // ── analyze ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_analyze_returns_analysis() {
        let model = Arc::new(FakeModel::returning(analysis_fixture()));
        let (status, body) =
            post_json(test_app(model.clone()), "/api/analyze", json!({"resumeText": RESUME})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["overallScore"], 78);
        assert_eq!(model.calls(), 1);

        let sections = body["analysis"]["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 5);
        for section in sections {
            let score = section["score"].as_u64().unwrap();
            assert!(score <= 100, "score {score} out of range");
            assert!(!section["feedback"].as_array().unwrap().is_empty());
        }
        assert_eq!(body["analysis"]["improvements"][0]["priority"], "high");
    }

    #[tokio::test]
    async fn test_analyze_short_resume_is_rejected_without_model_call() {
        let model = Arc::new(FakeModel::returning(analysis_fixture()));
        let (status, body) = post_json(
            test_app(model.clone()),
            "/api/analyze",
            json!({"resumeText": "a".repeat(49)}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], RESUME_TOO_SHORT);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_padded_resume_is_measured_trimmed() {
        let model = Arc::new(FakeModel::returning(analysis_fixture()));
        let padded = format!("{}{}{}", " ".repeat(40), "a".repeat(20), "\n".repeat(40));
        let (status, _) =
            post_json(test_app(model.clone()), "/api/analyze", json!({"resumeText": padded})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_non_string_resume_is_rejected() {
        let model = Arc::new(FakeModel::returning(analysis_fixture()));
        let (status, body) =
            post_json(test_app(model.clone()), "/api/analyze", json!({"resumeText": 12345})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], RESUME_TOO_SHORT);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_missing_field_is_rejected() {
        let model = Arc::new(FakeModel::returning(analysis_fixture()));
        let (status, _) = post_json(test_app(model.clone()), "/api/analyze", json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_malformed_json_is_bad_request() {
        let model = Arc::new(FakeModel::returning(analysis_fixture()));
        let (status, body) =
            post_raw(test_app(model.clone()), "/api/analyze", "{\"resumeText\": ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Request body must be a valid JSON object.");
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_model_failure_hides_cause() {
        let model = Arc::new(FakeModel::failing(401, "Incorrect API key provided: sk-live-123"));
        let (status, body) =
            post_json(test_app(model.clone()), "/api/analyze", json!({"resumeText": RESUME})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Failed to analyze resume. Please check your API key and try again."
        );
        assert!(!body.to_string().contains("sk-live"));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_analyze_malformed_model_output_is_server_error() {
        let model = Arc::new(FakeModel::returning(json!({"overallScore": 50})));
        let (status, body) =
            post_json(test_app(model.clone()), "/api/analyze", json!({"resumeText": RESUME})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("analysis").is_none());
    }

    // ── enhance ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_enhance_single_bullet() {
        let model = Arc::new(FakeModel::returning(json!({
            "enhancedBullets": [{
                "original": "Managed team",
                "enhanced": "Led a 6-person team delivering 3 releases ahead of schedule",
                "explanation": "Added scope and outcome"
            }]
        })));
        let (status, body) = post_json(
            test_app(model.clone()),
            "/api/enhance",
            json!({"mode": "bullets", "bulletPoints": ["Managed team"]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let bullets = body["result"]["enhancedBullets"].as_array().unwrap();
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0]["original"], "Managed team");
        assert_eq!(
            model.last_request().unwrap().user,
            "Enhance these resume bullet points:\n\n1. Managed team"
        );
    }

    #[tokio::test]
    async fn test_enhance_blank_bullets_are_dropped_before_prompting() {
        let model = Arc::new(FakeModel::returning(json!({"enhancedBullets": []})));
        let (status, _) = post_json(
            test_app(model.clone()),
            "/api/enhance",
            json!({"mode": "bullets", "bulletPoints": ["  ", "Cut costs", 7, ""]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            model.last_request().unwrap().user,
            "Enhance these resume bullet points:\n\n1. Cut costs"
        );
    }

    #[tokio::test]
    async fn test_enhance_empty_bullets_rejected() {
        let model = Arc::new(FakeModel::returning(json!({"enhancedBullets": []})));
        let (status, body) = post_json(
            test_app(model.clone()),
            "/api/enhance",
            json!({"mode": "bullets", "bulletPoints": ["", "   "]}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], NO_BULLETS);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_enhance_bullets_not_an_array_rejected() {
        let model = Arc::new(FakeModel::returning(json!({"enhancedBullets": []})));
        let (status, _) = post_json(
            test_app(model.clone()),
            "/api/enhance",
            json!({"mode": "bullets", "bulletPoints": "Managed team"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_enhance_full_rewrite() {
        let model = Arc::new(FakeModel::returning(json!({
            "rewrittenResume": "JANE DOE\nSenior Software Engineer",
            "changesSummary": ["Stronger verbs", "Consistent tense"],
            "improvementAreas": ["Impact"]
        })));
        let (status, body) = post_json(
            test_app(model.clone()),
            "/api/enhance",
            json!({"mode": "full", "resumeText": RESUME}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["result"]["rewrittenResume"],
            "JANE DOE\nSenior Software Engineer"
        );
        assert_eq!(body["result"]["changesSummary"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_enhance_full_short_resume_rejected() {
        let model = Arc::new(FakeModel::returning(json!({})));
        let (status, body) = post_json(
            test_app(model.clone()),
            "/api/enhance",
            json!({"mode": "full", "resumeText": "too short"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], REWRITE_RESUME_TOO_SHORT);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_enhance_invalid_mode_rejected_regardless_of_fields() {
        for body in [
            json!({"mode": "summary", "resumeText": RESUME, "bulletPoints": ["Managed team"]}),
            json!({"mode": "BULLETS", "bulletPoints": ["Managed team"]}),
            json!({"mode": 1, "resumeText": RESUME}),
            json!({"resumeText": RESUME}),
        ] {
            let model = Arc::new(FakeModel::returning(json!({})));
            let (status, response) =
                post_json(test_app(model.clone()), "/api/enhance", body).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], INVALID_MODE);
            assert_eq!(model.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_enhance_model_failure_is_generic() {
        let model = Arc::new(FakeModel::failing(500, "upstream exploded"));
        let (status, body) = post_json(
            test_app(model.clone()),
            "/api/enhance",
            json!({"mode": "full", "resumeText": RESUME}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Failed to enhance resume. Please check your API key and try again."
        );
    }

    // ── job match ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_job_match_returns_match() {
        let model = Arc::new(FakeModel::returning(job_match_fixture()));
        let (status, body) = post_json(
            test_app(model.clone()),
            "/api/job-match",
            json!({"resumeText": RESUME, "jobDescription": JOB}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match"]["matchScore"], 81);
        assert_eq!(body["match"]["gapAnalysis"][0]["area"], "Distributed systems");

        let user = model.last_request().unwrap().user;
        assert!(user.contains(RESUME));
        assert!(user.contains(JOB));
    }

    #[tokio::test]
    async fn test_job_match_short_description_rejected() {
        let model = Arc::new(FakeModel::returning(job_match_fixture()));
        let (status, body) = post_json(
            test_app(model.clone()),
            "/api/job-match",
            json!({"resumeText": RESUME, "jobDescription": "a".repeat(29)}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], JOB_DESCRIPTION_TOO_SHORT);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_job_match_checks_resume_first() {
        let model = Arc::new(FakeModel::returning(job_match_fixture()));
        let (status, body) = post_json(
            test_app(model.clone()),
            "/api/job-match",
            json!({"resumeText": "short", "jobDescription": "short"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], RESUME_TOO_SHORT);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_job_match_failure_is_generic() {
        let model = Arc::new(FakeModel::failing(429, "rate limited"));
        let (status, body) = post_json(
            test_app(model.clone()),
            "/api/job-match",
            json!({"resumeText": RESUME, "jobDescription": JOB}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Failed to match resume to job. Please check your API key and try again."
        );
    }
}
