//! Recent-log listing and the severity tiers used to colour it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::LogEntry;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl SeverityTier {
    pub fn of(entry: &LogEntry) -> Self {
        match entry.pain_severity() {
            None => SeverityTier::Low,
            Some(s) if s < 4 => SeverityTier::Low,
            Some(s) if s < 7 => SeverityTier::Medium,
            Some(_) => SeverityTier::High,
        }
    }
}

/// The last `limit` entries, oldest first, as handed across the boundary.
pub fn recent_logs(entries: &[LogEntry], limit: usize) -> &[LogEntry] {
    &entries[entries.len().saturating_sub(limit)..]
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RecentLogView {
    pub body_part: String,
    pub severity: Option<u8>,
    pub timestamp: DateTime<Utc>,
    pub tier: SeverityTier,
}

impl RecentLogView {
    /// Newest first, each row tagged with its display tier.
    pub fn newest_first(entries: &[LogEntry]) -> Vec<Self> {
        entries
            .iter()
            .rev()
            .map(|e| Self {
                body_part: e.body_part.clone(),
                severity: e.pain_severity(),
                timestamp: e.timestamp,
                tier: SeverityTier::of(e),
            })
            .collect()
    }
}
