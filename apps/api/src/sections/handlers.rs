//! Axum route handlers for the section and free-question endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::sections::models::{GeneratedSection, Section};
use crate::state::AppState;
use crate::topic_filter;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SectionRequest {
    #[serde(rename = "projeto", alias = "topic")]
    pub topic: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SectionResponse {
    #[serde(rename = "resposta")]
    pub answer: GeneratedSection,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(rename = "pergunta", alias = "question")]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    #[serde(rename = "resposta")]
    pub answer: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /visao
pub async fn handle_overview(
    State(state): State<AppState>,
    Json(request): Json<SectionRequest>,
) -> Result<Json<SectionResponse>, AppError> {
    generate_section(&state, Section::Overview, request).await
}

/// POST /materiais
pub async fn handle_materials(
    State(state): State<AppState>,
    Json(request): Json<SectionRequest>,
) -> Result<Json<SectionResponse>, AppError> {
    generate_section(&state, Section::Materials, request).await
}

/// POST /montagem
pub async fn handle_assembly(
    State(state): State<AppState>,
    Json(request): Json<SectionRequest>,
) -> Result<Json<SectionResponse>, AppError> {
    generate_section(&state, Section::Assembly, request).await
}

/// POST /procedimento
pub async fn handle_procedure(
    State(state): State<AppState>,
    Json(request): Json<SectionRequest>,
) -> Result<Json<SectionResponse>, AppError> {
    generate_section(&state, Section::Procedure, request).await
}

/// Topic filter → generate → cache.
///
/// An upstream failure still answers 200, with the error text as content.
/// Such answers are not cached, so the report gate keeps reporting the section as missing.
async fn generate_section(
    state: &AppState,
    section: Section,
    request: SectionRequest,
) -> Result<Json<SectionResponse>, AppError> {
    if !topic_filter::is_allowed(&request.topic) {
        info!(section = %section, topic = %request.topic, "topic denied");
        return Err(AppError::TopicDenied);
    }
    let session_id = request.session_id.trim();
    if session_id.is_empty() {
        return Err(AppError::Validation("session_id cannot be empty".to_string()));
    }

    let topic = request.topic.trim();
    let answer = match state.generator.generate_section(section, topic).await {
        Ok(answer) => {
            state.sessions.record(session_id, section, topic, &answer);
            info!(
                section = %section,
                session_id,
                keywords = ?topic_filter::matched_keywords(topic),
                books = answer.books.len(),
                "section generated"
            );
            answer
        }
        Err(e) => {
            warn!(section = %section, session_id, "section generation failed: {e}");
            GeneratedSection::degraded(e)
        }
    };

    Ok(Json(SectionResponse { answer }))
}

/// POST /perguntar
///
/// Free question within the allowed domain. Not cached.
pub async fn handle_question(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("pergunta cannot be empty".to_string()));
    }
    if !topic_filter::is_allowed(&request.question) {
        return Err(AppError::TopicDenied);
    }

    let answer = state
        .generator
        .answer_question(request.question.trim())
        .await
        .map_err(|e| AppError::Llm(format!("question failed: {e}")))?;

    Ok(Json(QuestionResponse { answer }))
}
