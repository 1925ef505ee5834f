//! Cross-cutting concerns around the log store.
//!
//! `LoggingStore` wraps any `PainLogStore` and adds:
//! - debug tracing with elapsed time per operation
//! - operation counters and latency histograms for the Prometheus exporter

use std::sync::Arc;
use std::time::Instant;

use edgecare_core::{LogEntry, LogResult, PainLogStore};
use tracing::debug;

#[derive(Clone)]
pub struct LoggingStore<S: PainLogStore> {
    inner: Arc<S>,
}

impl<S: PainLogStore> LoggingStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Execute a store operation with logging and metrics.
    async fn observed<F, Fut, T>(&self, operation: F, name: &'static str) -> LogResult<T>
    where
        F: FnOnce(Arc<S>) -> Fut,
        Fut: std::future::Future<Output = LogResult<T>>,
    {
        let start = Instant::now();
        debug!("Starting store operation: {}", name);

        let result = operation(self.inner.clone()).await;

        let duration = start.elapsed();
        let outcome = match &result {
            Ok(_) => {
                debug!("Store operation completed: {} in {:?}", name, duration);
                "ok"
            }
            Err(e) => {
                debug!("Store operation failed: {} in {:?} - error: {}", name, duration, e);
                "error"
            }
        };
        metrics::counter!("edgecare_store_ops_total", "op" => name, "outcome" => outcome)
            .increment(1);
        metrics::histogram!("edgecare_store_op_seconds", "op" => name)
            .record(duration.as_secs_f64());

        result
    }
}

#[async_trait::async_trait]
impl<S: PainLogStore> PainLogStore for LoggingStore<S> {
    async fn append(&self, athlete_id: &str, entry: LogEntry) -> LogResult<()> {
        self.observed(
            |store| async move { store.append(athlete_id, entry).await },
            "append",
        )
        .await
    }

    async fn entries(&self, athlete_id: &str) -> LogResult<Vec<LogEntry>> {
        self.observed(
            |store| async move { store.entries(athlete_id).await },
            "entries",
        )
        .await
    }

    async fn athletes(&self) -> LogResult<Vec<String>> {
        self.observed(|store| async move { store.athletes().await }, "athletes")
            .await
    }
}
