use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::sections::models::Section;
use crate::topic_filter::TOPIC_DENIED_MESSAGE;

const REPORT_INSTRUCTION: &str = "Chame as rotas /visao, /materiais, /montagem e /procedimento \
    usando o mesmo session_id antes de gerar o relatório.";

const REVISE_INSTRUCTION: &str = "Revise as seções listadas (re-pesquise com o mesmo projeto) \
    para torná-las coerentes antes de gerar o relatório.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Topic outside the allowed domain")]
    TopicDenied,

    #[error("Report incomplete, missing sections: {missing:?}")]
    ReportIncomplete { missing: Vec<Section> },

    #[error("Report inconsistent, mismatched sections: {mismatch:?}")]
    ReportInconsistent {
        mismatch: Vec<Section>,
        explanation: String,
    },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match &self {
                AppError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                AppError::TopicDenied => (
                    StatusCode::BAD_REQUEST,
                    "TOPIC_DENIED",
                    TOPIC_DENIED_MESSAGE.to_string(),
                    None,
                ),
                AppError::ReportIncomplete { missing } => (
                    StatusCode::BAD_REQUEST,
                    "REPORT_INCOMPLETE",
                    "Ainda não existem respostas para todas as seções.".to_string(),
                    Some(json!({
                        "missing": missing,
                        "instruction": REPORT_INSTRUCTION,
                    })),
                ),
                AppError::ReportInconsistent {
                    mismatch,
                    explanation,
                } => (
                    StatusCode::BAD_REQUEST,
                    "REPORT_INCONSISTENT",
                    "Inconsistência detectada entre as respostas das seções.".to_string(),
                    Some(json!({
                        "mismatch": mismatch,
                        "explanation": explanation,
                        "instruction": REVISE_INSTRUCTION,
                    })),
                ),
                AppError::Llm(msg) => {
                    tracing::error!("LLM error: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "LLM_ERROR",
                        "An AI processing error occurred".to_string(),
                        None,
                    )
                }
                AppError::Render(msg) => {
                    tracing::error!("Render error: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "RENDER_ERROR",
                        "The report could not be rendered".to_string(),
                        None,
                    )
                }
                AppError::Internal(e) => {
                    tracing::error!("Internal error: {e:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                        None,
                    )
                }
            };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
