// Resume feedback: analysis, enhancement and job matching.
// Every operation is one schema-constrained model call behind input validation.
// All LLM calls go through llm_client, never direct provider calls here.

pub mod analysis;
pub mod enhance;
pub mod handlers;
pub mod job_match;
pub mod models;
pub mod operation;
pub mod prompts;
pub mod validation;
