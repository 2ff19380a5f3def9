mod config;
mod errors;
mod layout;
mod llm_client;
mod render;
mod report;
mod routes;
mod sections;
mod session;
mod state;
mod topic_filter;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::default_page_config;
use crate::llm_client::LlmClient;
use crate::report::consistency::{ConsistencyChecker, LlmConsistencyChecker, TopicConsistencyChecker};
use crate::routes::build_router;
use crate::sections::generator::LlmContentGenerator;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FisiQIA API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        Duration::from_secs(config.llm_timeout_secs),
        config.llm_max_retries,
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout_secs
    );

    // Consistency checker: TopicConsistencyChecker unless ENABLE_LLM_CONSISTENCY_CHECK is set
    let consistency: Arc<dyn ConsistencyChecker> = if config.enable_llm_consistency_check {
        info!("Model-based consistency check enabled");
        Arc::new(LlmConsistencyChecker(llm.clone()))
    } else {
        Arc::new(TopicConsistencyChecker)
    };

    // Initialize session store and its eviction sweeper
    let sessions = SessionStore::new(
        Duration::from_secs(config.session_ttl_secs),
        Duration::from_secs(config.session_sweep_secs),
    );
    sessions.start_cleanup_task();
    info!(
        "Session store initialized (ttl: {}s, sweep: {}s)",
        config.session_ttl_secs, config.session_sweep_secs
    );

    if let Some(dist) = &config.frontend_dist {
        info!("Serving frontend from {}", dist.display());
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        sessions,
        generator: Arc::new(LlmContentGenerator(llm)),
        consistency,
        page_config: default_page_config(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
