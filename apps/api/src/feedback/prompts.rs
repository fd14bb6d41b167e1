// All LLM prompt constants for the feedback operations.
// System prompts are fixed; user messages embed the validated input.

/// System prompt for resume analysis.
pub const ANALYZE_SYSTEM: &str = "You are an expert resume analyst and career coach. \
    Analyze the provided resume thoroughly and provide detailed, actionable feedback. \
    Be specific and constructive. \
    Score objectively based on industry best practices for resume writing. \
    The 5 sections to score are: Formatting, Content Quality, ATS Compatibility, \
    Impact & Achievements, Readability. \
    Provide at least 4 pros and 4 cons. \
    Provide 5-8 improvements ordered by priority.";

/// Analysis prompt template. Replace `{resume_text}` before sending.
pub const ANALYZE_PROMPT_TEMPLATE: &str =
    "Please analyze this resume and provide a comprehensive evaluation:\n\n{resume_text}";

/// System prompt for bullet point enhancement.
pub const ENHANCE_BULLETS_SYSTEM: &str = "You are an expert resume writer. \
    Enhance the provided bullet points to make them more impactful. \
    Use strong action verbs, quantify achievements where possible, follow the STAR method, \
    and make each bullet concise yet powerful. \
    Keep the original meaning but make it significantly more compelling for recruiters \
    and ATS systems.";

/// Bullet enhancement prompt template. Replace `{numbered_bullets}` before sending.
pub const ENHANCE_BULLETS_PROMPT_TEMPLATE: &str =
    "Enhance these resume bullet points:\n\n{numbered_bullets}";

/// System prompt for a full resume rewrite.
pub const REWRITE_SYSTEM: &str = "You are an expert resume writer and career coach. \
    Rewrite the entire resume to be more professional, impactful, and ATS-friendly. \
    Improve formatting suggestions, strengthen bullet points, \
    add quantifiable achievements where possible, use strong action verbs, \
    and ensure consistent tense and style. \
    Keep the same information and structure but significantly improve the quality of writing. \
    Output the full rewritten resume in clean plain text.";

/// Rewrite prompt template. Replace `{resume_text}` before sending.
pub const REWRITE_PROMPT_TEMPLATE: &str =
    "Please rewrite and enhance this entire resume:\n\n{resume_text}";

/// System prompt for resume vs job description matching.
pub const JOB_MATCH_SYSTEM: &str = "You are an expert recruiter and ATS specialist. \
    Compare the provided resume against the job description. \
    Identify matching keywords, missing keywords, skill gaps, \
    and provide specific suggestions to tailor the resume for this role. \
    Be thorough with keyword matching - check for both exact and semantic matches. \
    Score the match from 0-100.";

/// Builds the job match user message. Formatted in one pass so text inside
/// either input is never treated as a placeholder.
pub fn job_match_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "Compare this resume against the job description and provide a detailed match analysis.\n\n\
         --- RESUME ---\n{resume_text}\n\n--- JOB DESCRIPTION ---\n{job_description}"
    )
}

/// Numbers bullets `1. ...`, one per line, in input order.
pub fn number_bullets(bullets: &[&str]) -> String {
    bullets
        .iter()
        .enumerate()
        .map(|(i, bullet)| format!("{}. {}", i + 1, bullet))
        .collect::<Vec<_>>()
        .join("\n")
}
