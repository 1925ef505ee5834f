//! Pain-log domain for EdgeCare: body-part selection, log submission,
//! the append-only log store and the weekly aggregations built on top of it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod aggregate;
pub mod body;
pub mod coach;
pub mod config;
pub mod form;
pub mod observability;
pub mod recent;
pub mod selection;
pub mod store;
pub mod submit;
pub mod utils;

pub use aggregate::{WeeklyChart, WeeklySummary, weekly_chart, weekly_summary};
pub use body::{BodyView, NO_PAIN};
pub use coach::{CoachWeeklyReport, LoadGuidance, coach_weekly_report, load_guidance};
pub use form::{FormFeedback, PainForm};
pub use recent::{RecentLogView, SeverityTier};
pub use selection::SelectionState;
pub use store::{JsonLinesStore, MemoryStore};
pub use submit::{LogService, SubmitOutcome};

#[derive(Debug, Error)]
pub enum LogError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

impl LogError {
    /// Storage-side failures leave no partial entry behind, so the caller may
    /// simply resubmit.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LogError::Storage(_) | LogError::Io(_) | LogError::Serialization(_)
        )
    }
}

pub type LogResult<T> = Result<T, LogError>;

/// One submission: either a real pain report or the "No Pain" sentinel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub body_part: String,
    /// `None` for the "No Pain" sentinel, `1..=10` otherwise.
    pub severity: Option<u8>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn pain(body_part: impl Into<String>, severity: u8, timestamp: DateTime<Utc>) -> Self {
        Self {
            body_part: body_part.into(),
            severity: Some(severity),
            timestamp,
        }
    }

    pub fn no_pain(timestamp: DateTime<Utc>) -> Self {
        Self {
            body_part: NO_PAIN.to_string(),
            severity: None,
            timestamp,
        }
    }

    pub fn is_no_pain(&self) -> bool {
        self.body_part == NO_PAIN
    }

    /// Severity of a real pain entry; the sentinel never has one.
    pub fn pain_severity(&self) -> Option<u8> {
        if self.is_no_pain() {
            None
        } else {
            self.severity
        }
    }
}

/// Append-only per-athlete entry store.
///
/// Implementations must serialize appends for a given athlete so that
/// concurrent submissions are neither lost nor reordered, and an entry is
/// either fully stored or not stored at all.
#[async_trait]
pub trait PainLogStore: Send + Sync + 'static {
    async fn append(&self, athlete_id: &str, entry: LogEntry) -> LogResult<()>;

    /// All entries for the athlete in insertion (chronological) order.
    async fn entries(&self, athlete_id: &str) -> LogResult<Vec<LogEntry>>;

    /// Distinct athlete ids in the order they first appeared.
    async fn athletes(&self) -> LogResult<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_entry_has_no_pain_severity() {
        let e = LogEntry::no_pain(Utc::now());
        assert!(e.is_no_pain());
        assert_eq!(e.pain_severity(), None);
    }

    #[test]
    fn sentinel_with_stray_severity_is_still_ignored() {
        let mut e = LogEntry::no_pain(Utc::now());
        e.severity = Some(0);
        assert_eq!(e.pain_severity(), None);
    }

    #[test]
    fn storage_errors_are_retryable() {
        assert!(LogError::Storage("disk full".into()).is_retryable());
        assert!(!LogError::Validation("bad".into()).is_retryable());
    }
}
