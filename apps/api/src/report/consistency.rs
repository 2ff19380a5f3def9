//! Consistency check behind a pluggable trait, run after the gate.
//!
//! Default: `TopicConsistencyChecker` (the gate's topic agreement is enough).
//! Optional: `LlmConsistencyChecker`, swapped in via ENABLE_LLM_CONSISTENCY_CHECK.
//!
//! `AppState` holds an `Arc<dyn ConsistencyChecker>`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::report::gate::GatedReport;
use crate::report::prompts::{CONSISTENCY_MAX_TOKENS, CONSISTENCY_PROMPT_TEMPLATE};
use crate::sections::models::Section;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyVerdict {
    pub consistent: bool,
    #[serde(default)]
    pub mismatch: Vec<Section>,
    #[serde(default)]
    pub explanation: String,
}

impl ConsistencyVerdict {
    pub fn consistent() -> Self {
        Self {
            consistent: true,
            mismatch: vec![],
            explanation: String::new(),
        }
    }
}

#[async_trait]
pub trait ConsistencyChecker: Send + Sync {
    async fn check(&self, report: &GatedReport) -> ConsistencyVerdict;
}

/// Trusts the gate: every section already carries the report's topic.
pub struct TopicConsistencyChecker;

#[async_trait]
impl ConsistencyChecker for TopicConsistencyChecker {
    async fn check(&self, _report: &GatedReport) -> ConsistencyVerdict {
        ConsistencyVerdict::consistent()
    }
}

/// Asks the model whether the four texts describe one project.
/// A failed call or unparsable verdict counts as consistent.
pub struct LlmConsistencyChecker(pub LlmClient);

#[async_trait]
impl ConsistencyChecker for LlmConsistencyChecker {
    async fn check(&self, report: &GatedReport) -> ConsistencyVerdict {
        let prompt = match build_prompt(report) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("could not serialize sections for consistency check: {e}");
                return ConsistencyVerdict::consistent();
            }
        };

        match self
            .0
            .call_json::<ConsistencyVerdict>(&prompt, JSON_ONLY_SYSTEM, CONSISTENCY_MAX_TOKENS)
            .await
        {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("consistency check unavailable, letting report through: {e}");
                ConsistencyVerdict::consistent()
            }
        }
    }
}

fn build_prompt(report: &GatedReport) -> Result<String, serde_json::Error> {
    let sections: BTreeMap<&str, &str> = report
        .record
        .sections
        .iter()
        .map(|(section, entry)| (section.as_str(), entry.text.as_str()))
        .collect();
    let sections_json = serde_json::to_string_pretty(&sections)?;

    Ok(CONSISTENCY_PROMPT_TEMPLATE
        .replace("{topic}", &report.topic)
        .replace("{sections_json}", &sections_json))
}
