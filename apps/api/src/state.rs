use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GenerativeModel;
use crate::store::CandidateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Injectable model client. Production: GeminiClient; tests: scripted double.
    pub llm: Arc<dyn GenerativeModel>,
    /// Candidate record store. Production: PgCandidateStore.
    pub store: Arc<dyn CandidateStore>,
    /// Retained for handlers that need runtime configuration.
    #[allow(dead_code)]
    pub config: Config,
}
