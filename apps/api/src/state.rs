use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::StructuredModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    /// Schema-constrained model. Default: `LlmClient`; tests swap in a fake.
    pub model: Arc<dyn StructuredModel>,
    pub config: Config,
}
