use std::sync::Arc;

use crate::config::Config;
use crate::layout::PageConfig;
use crate::report::consistency::ConsistencyChecker;
use crate::sections::generator::ContentGenerator;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Per-session answer cache, evicted by TTL.
    pub sessions: SessionStore,
    /// Pluggable content backend. Default: LlmContentGenerator.
    pub generator: Arc<dyn ContentGenerator>,
    /// Pluggable post-gate check. Swap via ENABLE_LLM_CONSISTENCY_CHECK.
    pub consistency: Arc<dyn ConsistencyChecker>,
    pub page_config: PageConfig,
}
