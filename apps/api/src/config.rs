use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if `OPENAI_API_KEY` is missing, a numeric value does not parse,
/// or a timeout/TTL/sweep interval is zero.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub session_ttl_secs: u64,
    pub session_sweep_secs: u64,
    pub enable_llm_consistency_check: bool,
    /// Built frontend (`index.html` + assets). Static serving is off when unset.
    pub frontend_dist: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            llm_timeout_secs: parse_nonzero_env("LLM_TIMEOUT_SECS", 60)?,
            llm_max_retries: parse_env("LLM_MAX_RETRIES", 3)?,
            session_ttl_secs: parse_nonzero_env("SESSION_TTL_SECS", 7200)?,
            session_sweep_secs: parse_nonzero_env("SESSION_SWEEP_SECS", 300)?,
            enable_llm_consistency_check: parse_env("ENABLE_LLM_CONSISTENCY_CHECK", false)?,
            frontend_dist: std::env::var("FRONTEND_DIST")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Durations in seconds. Zero would expire every session, time out every call,
/// or stop the sweeper, so it is rejected at startup.
fn parse_nonzero_env(key: &str, default: u64) -> Result<u64> {
    let value = parse_env(key, default)?;
    anyhow::ensure!(value > 0, "Environment variable '{key}' must be greater than zero");
    Ok(value)
}
