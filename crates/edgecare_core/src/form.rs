//! Session-scoped logging form: the body-map selection plus the severity
//! input, and what happens to both when a submission succeeds or fails.

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::config::{Config, DEFAULT_RESET_DELAY};
use crate::selection::SelectionState;
use crate::submit::{LogService, SubmitOutcome};
use crate::{LogError, LogResult};

pub const DEFAULT_SEVERITY: i64 = 5;

/// What the UI shows after a submit attempt.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FormFeedback {
    pub success: bool,
    pub message: String,
    /// Delay before the UI clears the confirmation; only set on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_after: Option<Duration>,
    pub retryable: bool,
}

impl FormFeedback {
    fn failed(err: &LogError) -> Self {
        Self {
            success: false,
            message: match err {
                LogError::Validation(msg) => msg.clone(),
                _ => "Could not save your entry. Please try again.".to_string(),
            },
            reset_after: None,
            retryable: err.is_retryable(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PainForm {
    pub selection: SelectionState,
    severity: i64,
    reset_delay: Duration,
}

impl Default for PainForm {
    fn default() -> Self {
        Self {
            selection: SelectionState::new(),
            severity: DEFAULT_SEVERITY,
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }
}

impl PainForm {
    pub fn new(config: &Config) -> Self {
        Self {
            reset_delay: config.reset_delay,
            ..Self::default()
        }
    }

    pub fn severity(&self) -> i64 {
        self.severity
    }

    pub fn set_severity(&mut self, severity: i64) {
        self.severity = severity;
    }

    pub fn submit_enabled(&self) -> bool {
        self.selection.submit_enabled()
    }

    fn reset(&mut self) {
        self.selection.clear();
        self.severity = DEFAULT_SEVERITY;
    }

    /// Submit the selected part at the current severity.
    ///
    /// Nothing reaches the store without a selection. On success the form is
    /// reset; on any failure selection and severity are kept for a retry.
    pub async fn submit(&mut self, service: &LogService, athlete_id: &str) -> FormFeedback {
        let result: LogResult<SubmitOutcome> = match self.selection.selected() {
            None => Err(LogError::Validation("No body part selected.".into())),
            Some(part) => service.submit_pain(athlete_id, part, self.severity).await,
        };
        match result {
            Ok(outcome) => {
                self.reset();
                FormFeedback {
                    success: outcome.success,
                    message: outcome.message,
                    reset_after: Some(self.reset_delay),
                    retryable: false,
                }
            }
            Err(e) => {
                warn!(athlete = athlete_id, error = %e, "pain submission failed");
                FormFeedback::failed(&e)
            }
        }
    }

    /// Needs no selection and leaves any current selection untouched.
    pub async fn log_no_pain(&self, service: &LogService, athlete_id: &str) -> FormFeedback {
        match service.submit_no_pain(athlete_id).await {
            Ok(outcome) => FormFeedback {
                success: outcome.success,
                message: outcome.message,
                reset_after: Some(self.reset_delay),
                retryable: false,
            },
            Err(e) => {
                warn!(athlete = athlete_id, error = %e, "no-pain submission failed");
                FormFeedback::failed(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::{LogEntry, MemoryStore, PainLogStore};

    /// Fails appends while `down` is set.
    #[derive(Default)]
    struct FlakyStore {
        down: AtomicBool,
        inner: MemoryStore,
    }

    #[async_trait]
    impl PainLogStore for FlakyStore {
        async fn append(&self, athlete_id: &str, entry: LogEntry) -> LogResult<()> {
            if self.down.load(Ordering::SeqCst) {
                return Err(LogError::Storage("disk unavailable".into()));
            }
            self.inner.append(athlete_id, entry).await
        }
        async fn entries(&self, athlete_id: &str) -> LogResult<Vec<LogEntry>> {
            self.inner.entries(athlete_id).await
        }
        async fn athletes(&self) -> LogResult<Vec<String>> {
            self.inner.athletes().await
        }
    }

    #[tokio::test]
    async fn submit_without_selection_is_rejected_locally() {
        let svc = LogService::new(Arc::new(MemoryStore::new()));
        let mut form = PainForm::default();
        assert!(!form.submit_enabled());
        let fb = form.submit(&svc, "p1").await;
        assert!(!fb.success);
        assert!(!fb.retryable);
        assert!(svc.recent_logs("p1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn success_resets_selection_and_severity() {
        let svc = LogService::new(Arc::new(MemoryStore::new()));
        let config = Config {
            reset_delay: Duration::from_millis(10),
            ..Config::default()
        };
        let mut form = PainForm::new(&config);
        form.selection.select("Left Ankle").unwrap();
        form.set_severity(9);
        let fb = form.submit(&svc, "p1").await;
        assert!(fb.success);
        assert!(fb.message.contains("Left Ankle"));
        assert_eq!(fb.reset_after, Some(Duration::from_millis(10)));
        assert_eq!(form.selection.selected(), None);
        assert_eq!(form.severity(), DEFAULT_SEVERITY);
    }

    #[tokio::test]
    async fn storage_failure_preserves_input_for_retry() {
        let store = Arc::new(FlakyStore::default());
        store.down.store(true, Ordering::SeqCst);
        let svc = LogService::new(store.clone());
        let mut form = PainForm::default();
        form.selection.select("Chest").unwrap();
        form.set_severity(8);

        let fb = form.submit(&svc, "p1").await;
        assert!(!fb.success);
        assert!(fb.retryable);
        assert_eq!(form.selection.selected(), Some("Chest"));
        assert_eq!(form.severity(), 8);
        assert!(store.entries("p1").await.unwrap().is_empty());

        store.down.store(false, Ordering::SeqCst);
        assert!(form.submit(&svc, "p1").await.success);
        assert_eq!(store.entries("p1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_severity_keeps_selection() {
        let svc = LogService::new(Arc::new(MemoryStore::new()));
        let mut form = PainForm::default();
        form.selection.select("Chest").unwrap();
        form.set_severity(11);
        let fb = form.submit(&svc, "p1").await;
        assert!(!fb.success);
        assert_eq!(form.selection.selected(), Some("Chest"));
    }

    #[tokio::test]
    async fn no_pain_leaves_selection_alone() {
        let svc = LogService::new(Arc::new(MemoryStore::new()));
        let mut form = PainForm::default();
        form.selection.select("Chest").unwrap();
        let fb = form.log_no_pain(&svc, "p1").await;
        assert!(fb.success);
        assert_eq!(form.selection.selected(), Some("Chest"));
    }
}
