use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelClient;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Default: GeminiClient.
    pub model: Arc<dyn ModelClient>,
    pub sessions: SessionStore,
    pub config: Config,
}
