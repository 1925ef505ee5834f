//! Log submission and the read operations the boundary exposes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::aggregate::{WeeklyChart, WeeklySummary, weekly_chart, weekly_summary};
use crate::coach::{CoachWeeklyReport, coach_weekly_report};
use crate::config::DEFAULT_RECENT_LIMIT;
use crate::recent::recent_logs;
use crate::{LogEntry, LogError, LogResult, PainLogStore, body};

pub const MIN_SEVERITY: i64 = 1;
pub const MAX_SEVERITY: i64 = 10;
pub const NO_PAIN_MESSAGE: &str = "No pain recorded for today.";

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
    pub record: LogEntry,
}

/// Checks a pain report before it can reach the store.
pub fn validate_pain(body_part: &str, severity: i64) -> LogResult<u8> {
    if body_part.trim().is_empty() {
        return Err(LogError::Validation("No body part selected.".into()));
    }
    if !body::is_known(body_part) {
        return Err(LogError::Validation("Invalid body part.".into()));
    }
    if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&severity) {
        return Err(LogError::Validation(format!(
            "Severity must be between {MIN_SEVERITY} and {MAX_SEVERITY}, got {severity}."
        )));
    }
    Ok(severity as u8)
}

#[derive(Clone)]
pub struct LogService {
    store: Arc<dyn PainLogStore>,
    recent_limit: usize,
    /// Held from stamping `now` until the append returns, so log order is
    /// timestamp order.
    write_turn: Arc<Mutex<()>>,
}

impl LogService {
    pub fn new(store: Arc<dyn PainLogStore>) -> Self {
        Self {
            store,
            recent_limit: DEFAULT_RECENT_LIMIT,
            write_turn: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub async fn submit_pain(
        &self,
        athlete_id: &str,
        body_part: &str,
        severity: i64,
    ) -> LogResult<SubmitOutcome> {
        let _turn = self.write_turn.lock().await;
        self.submit_pain_at(athlete_id, body_part, severity, Utc::now())
            .await
    }

    pub async fn submit_pain_at(
        &self,
        athlete_id: &str,
        body_part: &str,
        severity: i64,
        now: DateTime<Utc>,
    ) -> LogResult<SubmitOutcome> {
        let severity = validate_pain(body_part, severity)?;
        let entry = LogEntry::pain(body_part, severity, now);
        self.store.append(athlete_id, entry.clone()).await?;
        info!(athlete = athlete_id, body_part, severity, "pain logged");
        Ok(SubmitOutcome {
            success: true,
            message: format!("Pain logged: {body_part} (severity {severity})"),
            record: entry,
        })
    }

    /// Not idempotent: each call appends another sentinel entry.
    pub async fn submit_no_pain(&self, athlete_id: &str) -> LogResult<SubmitOutcome> {
        let _turn = self.write_turn.lock().await;
        self.submit_no_pain_at(athlete_id, Utc::now()).await
    }

    pub async fn submit_no_pain_at(
        &self,
        athlete_id: &str,
        now: DateTime<Utc>,
    ) -> LogResult<SubmitOutcome> {
        let entry = LogEntry::no_pain(now);
        self.store.append(athlete_id, entry.clone()).await?;
        info!(athlete = athlete_id, "no pain logged");
        Ok(SubmitOutcome {
            success: true,
            message: NO_PAIN_MESSAGE.to_string(),
            record: entry,
        })
    }

    /// Latest entries, oldest first.
    pub async fn recent_logs(&self, athlete_id: &str) -> LogResult<Vec<LogEntry>> {
        let entries = self.store.entries(athlete_id).await?;
        Ok(recent_logs(&entries, self.recent_limit).to_vec())
    }

    pub async fn weekly_summary(
        &self,
        athlete_id: &str,
        now: DateTime<Utc>,
    ) -> LogResult<WeeklySummary> {
        let entries = self.store.entries(athlete_id).await?;
        Ok(weekly_summary(&entries, now))
    }

    pub async fn weekly_chart(&self, athlete_id: &str, now: DateTime<Utc>) -> LogResult<WeeklyChart> {
        let entries = self.store.entries(athlete_id).await?;
        Ok(weekly_chart(&entries, now))
    }

    pub async fn coach_report(
        &self,
        athlete_id: &str,
        now: DateTime<Utc>,
    ) -> LogResult<CoachWeeklyReport> {
        let entries = self.store.entries(athlete_id).await?;
        Ok(coach_weekly_report(athlete_id, &entries, now))
    }

    pub async fn athletes(&self) -> LogResult<Vec<String>> {
        self.store.athletes().await
    }
}
