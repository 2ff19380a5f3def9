//! Section generation behind a pluggable trait.
//!
//! Default: `LlmContentGenerator` (chat-completions via `llm_client`).
//! `AppState` holds an `Arc<dyn ContentGenerator>` so handlers can be driven
//! by a stub in tests.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::llm_client::{strip_json_fences, LlmClient, LlmError};
use crate::sections::models::{GeneratedSection, Section};
use crate::sections::prompts::{
    section_prompt, INVALID_JSON_NOTE, QUESTION_MAX_TOKENS, SECTION_MAX_TOKENS, SECTION_SYSTEM,
};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_section(
        &self,
        section: Section,
        topic: &str,
    ) -> Result<GeneratedSection, LlmError>;

    async fn answer_question(&self, question: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmContentGenerator
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmContentGenerator(pub LlmClient);

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate_section(
        &self,
        section: Section,
        topic: &str,
    ) -> Result<GeneratedSection, LlmError> {
        let prompt = section_prompt(section, topic);
        let raw = self
            .0
            .call_text(&prompt, Some(SECTION_SYSTEM), SECTION_MAX_TOKENS)
            .await?;
        debug!(section = %section, chars = raw.len(), "section reply received");
        Ok(parse_section_reply(&raw))
    }

    async fn answer_question(&self, question: &str) -> Result<String, LlmError> {
        self.0.call_text(question, None, QUESTION_MAX_TOKENS).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reply parsing
// ────────────────────────────────────────────────────────────────────────────

/// Shape the model is asked to return. `books` is loose because models mix
/// plain strings with `{author, title}` objects.
#[derive(Debug, Deserialize)]
struct SectionReply {
    #[serde(default)]
    content: String,
    #[serde(default)]
    books: Vec<Value>,
    #[serde(default)]
    notes: String,
}

/// Parses a section reply. Non-JSON replies keep the raw text as content.
pub fn parse_section_reply(raw: &str) -> GeneratedSection {
    match serde_json::from_str::<SectionReply>(strip_json_fences(raw)) {
        Ok(reply) => GeneratedSection {
            content: reply.content.trim().to_string(),
            books: normalize_books(&reply.books),
            notes: reply.notes.trim().to_string(),
        },
        Err(e) => {
            warn!("section reply is not valid JSON ({e}); keeping raw text");
            GeneratedSection {
                content: raw.trim().to_string(),
                books: vec![],
                notes: INVALID_JSON_NOTE.to_string(),
            }
        }
    }
}

fn normalize_books(books: &[Value]) -> Vec<String> {
    books.iter().filter_map(book_label).collect()
}

fn book_label(book: &Value) -> Option<String> {
    match book {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Object(map) => {
            let field = |keys: &[&str]| {
                keys.iter()
                    .filter_map(|k| map.get(*k).and_then(Value::as_str))
                    .map(str::trim)
                    .find(|v| !v.is_empty())
            };
            let author = field(&["author", "autor", "authors", "autores"]);
            let title = field(&["title", "titulo", "título", "obra"]);
            match (author, title) {
                (Some(a), Some(t)) => Some(format!("{a}, {t}")),
                (None, Some(t)) => Some(t.to_string()),
                (Some(a), None) => Some(a.to_string()),
                (None, None) => None,
            }
        }
        _ => None,
    }
}
