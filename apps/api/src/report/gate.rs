//! Report gate: a session may only be rendered once all four sections exist
//! and every section was generated for the topic the report is about.

use crate::errors::AppError;
use crate::sections::models::Section;
use crate::session::SessionRecord;

/// Title used when neither the request nor the session carries a topic.
pub const FALLBACK_TOPIC: &str = "Projeto";

/// A session that passed the gate, together with the topic it will be rendered for.
#[derive(Debug, Clone)]
pub struct GatedReport {
    pub topic: String,
    pub record: SessionRecord,
}

/// Sections with no cached answer, in report order.
pub fn missing_sections(record: Option<&SessionRecord>) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|s| record.map_or(true, |r| r.section(*s).is_none()))
        .collect()
}

/// Requested topic if non-blank, else the session's first-write topic.
pub fn resolve_topic(requested: Option<&str>, record: Option<&SessionRecord>) -> String {
    requested
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| {
            record
                .and_then(|r| r.topic.as_deref())
                .map(str::trim)
                .filter(|t| !t.is_empty())
        })
        .unwrap_or(FALLBACK_TOPIC)
        .to_string()
}

/// Sections whose recorded topic differs from `topic` (trimmed, case-folded).
pub fn mismatched_sections(record: &SessionRecord, topic: &str) -> Vec<Section> {
    let wanted = normalize(topic);
    record
        .sections
        .iter()
        .filter(|(_, entry)| normalize(&entry.topic) != wanted)
        .map(|(section, _)| *section)
        .collect()
}

fn normalize(topic: &str) -> String {
    topic.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Presence check first, then topic agreement.
pub fn check(record: Option<SessionRecord>, requested_topic: Option<&str>) -> Result<GatedReport, AppError> {
    let missing = missing_sections(record.as_ref());
    let topic = resolve_topic(requested_topic, record.as_ref());

    let record = match record {
        Some(record) if missing.is_empty() => record,
        _ => return Err(AppError::ReportIncomplete { missing }),
    };

    let mismatch = mismatched_sections(&record, &topic);
    if !mismatch.is_empty() {
        return Err(AppError::ReportInconsistent {
            explanation: format!(
                "As seções listadas foram geradas para outro projeto que não '{topic}'."
            ),
            mismatch,
        });
    }

    Ok(GatedReport { topic, record })
}
