//! In-memory, session-scoped answer cache.
//!
//! Keyed by the caller-supplied session id. Each write locks only its own
//! entry, so concurrent writes for different sections of one session never
//! clobber each other. Idle sessions expire after the configured TTL.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::sections::models::{GeneratedSection, Section};

/// One cached section answer, tagged with the topic it was generated for.
#[derive(Debug, Clone)]
pub struct SectionEntry {
    pub text: String,
    pub books: Vec<String>,
    pub notes: String,
    pub topic: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Topic seen on the first write; later writes never replace it.
    pub topic: Option<String>,
    pub sections: BTreeMap<Section, SectionEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            topic: None,
            sections: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn section(&self, section: Section) -> Option<&SectionEntry> {
        self.sections.get(&section)
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SessionRecord>>,
    ttl: chrono::Duration,
    sweep_interval: Duration,
}

/// `tokio::time::interval` panics on a zero period.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

impl SessionStore {
    pub fn new(ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52 * 100)),
            sweep_interval: sweep_interval.max(MIN_SWEEP_INTERVAL),
        }
    }

    /// Stores an answer for `(session_id, section)`. Last write wins.
    pub fn record(&self, session_id: &str, section: Section, topic: &str, answer: &GeneratedSection) {
        self.record_at(session_id, section, topic, answer, Utc::now());
    }

    fn record_at(
        &self,
        session_id: &str,
        section: Section,
        topic: &str,
        answer: &GeneratedSection,
        now: DateTime<Utc>,
    ) {
        let mut record = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionRecord::new(now));

        // An expired record that the sweeper hasn't reached yet starts over.
        if self.is_expired(&record, now) {
            *record = SessionRecord::new(now);
        }

        if record.topic.is_none() {
            record.topic = Some(topic.trim().to_string());
        }
        record.sections.insert(
            section,
            SectionEntry {
                text: answer.content.clone(),
                books: answer.books.clone(),
                notes: answer.notes.clone(),
                topic: topic.trim().to_string(),
                generated_at: now,
            },
        );
        record.updated_at = now;
        debug!(session_id, section = %section, "section cached");
    }

    /// Returns a snapshot of the session, or `None` if absent or expired.
    pub fn get(&self, session_id: &str) -> Option<SessionRecord> {
        self.get_at(session_id, Utc::now())
    }

    fn get_at(&self, session_id: &str, now: DateTime<Utc>) -> Option<SessionRecord> {
        self.sessions
            .get(session_id)
            .filter(|record| !self.is_expired(record, now))
            .map(|record| record.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    fn is_expired(&self, record: &SessionRecord, now: DateTime<Utc>) -> bool {
        now - record.updated_at > self.ttl
    }

    /// Drops every session idle for longer than the TTL. Returns how many were removed.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, record| now - record.updated_at <= self.ttl);
        before.saturating_sub(self.sessions.len())
    }

    /// Start a background task that evicts expired sessions every sweep interval.
    pub fn start_cleanup_task(&self) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(store.sweep_interval);
            loop {
                interval.tick().await;
                let removed = store.purge_expired_at(Utc::now());
                if removed > 0 {
                    info!("Evicted {removed} expired session(s), {} remaining", store.len());
                }
            }
        })
    }
}
