//! Axum route handler for the PDF report.

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::render::render_pdf;
use crate::report::document::ReportDocument;
use crate::report::gate;
use crate::state::AppState;

pub const REPORT_FILENAME: &str = "relatorio.pdf";

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    /// Falls back to the session's first-write topic when absent or blank.
    #[serde(default, rename = "projeto", alias = "topic")]
    pub topic: Option<String>,
    pub session_id: String,
}

/// POST /relatorio
///
/// Gate (presence + topic) → consistency check → layout + render → PDF attachment.
pub async fn handle_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = request.session_id.trim();
    if session_id.is_empty() {
        return Err(AppError::Validation("session_id cannot be empty".to_string()));
    }

    let record = state.sessions.get(session_id);
    let gated = gate::check(record, request.topic.as_deref()).map_err(|e| {
        info!(session_id, "report rejected: {e}");
        e
    })?;

    let verdict = state.consistency.check(&gated).await;
    if !verdict.consistent {
        info!(session_id, mismatch = ?verdict.mismatch, "report rejected by consistency check");
        return Err(AppError::ReportInconsistent {
            mismatch: verdict.mismatch,
            explanation: verdict.explanation,
        });
    }

    let document = ReportDocument::from_gated(&gated);
    let page_config = state.page_config.clone();

    // CPU-bound layout + PDF serialization runs in spawn_blocking.
    let pdf = tokio::task::spawn_blocking(move || render_pdf(&document, &page_config))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))?
        .map_err(|e| AppError::Render(e.to_string()))?;

    info!(session_id, topic = %gated.topic, bytes = pdf.len(), "report rendered");

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        Bytes::from(pdf),
    ))
}
