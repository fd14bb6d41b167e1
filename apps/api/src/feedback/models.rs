//! Structured records returned by the model for each feedback operation.
//!
//! Field docs double as schema descriptions: `schemars` copies them into the
//! JSON schema sent with every request, so they are written for the model.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound of every score field.
pub const MAX_SCORE: u8 = 100;

/// Accepts any JSON number for a score, rounds it and clamps it into 0–100.
/// Scores come from the model and are not trusted to respect the schema.
fn clamped_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("score must be a finite number"));
    }
    Ok(raw.round().clamp(0.0, f64::from(MAX_SCORE)) as u8)
}

// ────────────────────────────────────────────────────────────────────────────
// Resume analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    /// Overall resume score from 0 to 100
    #[serde(deserialize_with = "clamped_score")]
    #[schemars(range(min = 0, max = 100))]
    pub overall_score: u8,
    /// 2-3 sentence executive summary of the resume quality
    pub summary: String,
    /// List of 4-6 strengths/things the resume does well
    pub pros: Vec<String>,
    /// List of 4-6 weaknesses/areas that need improvement
    pub cons: Vec<String>,
    /// Detailed breakdown of 5 resume sections
    pub sections: Vec<SectionScore>,
    pub keywords: KeywordReport,
    /// Ordered list of 5-8 specific improvements
    pub improvements: Vec<Improvement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SectionScore {
    /// Section name like Formatting, Content, ATS Compatibility, Impact, Readability
    pub name: String,
    /// Score from 0 to 100 for this section
    #[serde(deserialize_with = "clamped_score")]
    #[schemars(range(min = 0, max = 100))]
    pub score: u8,
    /// 2-4 specific feedback items for this section
    pub feedback: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeywordReport {
    /// Keywords/skills found in the resume
    pub found: Vec<String>,
    /// Important keywords/skills missing from the resume
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Improvement {
    /// Priority level
    pub priority: Priority,
    /// Short title of the improvement
    pub title: String,
    /// Detailed description of what to improve and how
    pub description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Job match
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    /// Overall match score from 0 to 100 for this job
    #[serde(deserialize_with = "clamped_score")]
    #[schemars(range(min = 0, max = 100))]
    pub match_score: u8,
    /// 2-3 sentence summary of how well the resume matches the job
    pub match_summary: String,
    /// Keywords from the job description found in the resume
    pub matched_keywords: Vec<String>,
    /// Important keywords from the job description missing from the resume
    pub missing_keywords: Vec<String>,
    /// Detailed gap analysis between resume and job requirements
    pub gap_analysis: Vec<Gap>,
    /// 5-8 specific suggestions to tailor the resume for this job
    pub tailored_suggestions: Vec<String>,
    /// 3-5 strengths that align well with the job
    pub strengths_for_role: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Gap {
    /// Area or skill where there is a gap
    pub area: String,
    /// Description of the gap
    pub gap: String,
    /// How to address the gap
    pub suggestion: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Enhancement
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceBullets {
    /// Each bullet point with its enhanced version
    pub enhanced_bullets: Vec<EnhancedBullet>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnhancedBullet {
    /// The original bullet point text
    pub original: String,
    /// The enhanced, more impactful version
    pub enhanced: String,
    /// Brief explanation of what was improved
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FullRewrite {
    /// The full rewritten resume in clean plain text format
    pub rewritten_resume: String,
    /// List of 4-6 key changes made in the rewrite
    pub changes_summary: Vec<String>,
    /// Areas that were most improved
    pub improvement_areas: Vec<String>,
}
