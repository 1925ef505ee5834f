//! `PainLogStore` implementations: an in-memory map for tests and ephemeral
//! runs, and an append-only JSON-lines file for durable storage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, SeekFrom};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{LogEntry, LogResult, PainLogStore};

type AthleteLog = Arc<Mutex<Vec<LogEntry>>>;

#[derive(Default)]
pub struct MemoryStore {
    logs: Mutex<HashMap<String, AthleteLog>>,
    order: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn log_for(&self, athlete_id: &str) -> AthleteLog {
        let mut logs = self.logs.lock().await;
        if let Some(log) = logs.get(athlete_id) {
            return log.clone();
        }
        self.order.lock().await.push(athlete_id.to_string());
        let log = AthleteLog::default();
        logs.insert(athlete_id.to_string(), log.clone());
        log
    }
}

#[async_trait]
impl PainLogStore for MemoryStore {
    async fn append(&self, athlete_id: &str, entry: LogEntry) -> LogResult<()> {
        // Only the athlete's own log is held across the push, so writers for
        // different athletes never wait on each other.
        let log = self.log_for(athlete_id).await;
        log.lock().await.push(entry);
        Ok(())
    }

    async fn entries(&self, athlete_id: &str) -> LogResult<Vec<LogEntry>> {
        let log = self.logs.lock().await.get(athlete_id).cloned();
        match log {
            Some(log) => Ok(log.lock().await.clone()),
            None => Ok(Vec::new()),
        }
    }

    async fn athletes(&self) -> LogResult<Vec<String>> {
        Ok(self.order.lock().await.clone())
    }
}

/// On-disk row. No-Pain rows carry a null severity.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    timestamp: DateTime<Utc>,
    athlete_id: String,
    body_part: String,
    severity: Option<u8>,
}

/// Append-only log file with one JSON object per line.
///
/// The file is created on first append. Lines that fail to parse (a torn
/// final line, manual edits) are skipped on read. An append always starts on
/// a fresh line and is cut back off the file if it cannot be written whole.
pub struct JsonLinesStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonLinesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> LogResult<Vec<StoredRecord>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (idx, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredRecord>(line) {
                Ok(rec) => records.push(rec),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = idx + 1,
                    error = %e,
                    "skipping unreadable log line"
                ),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl PainLogStore for JsonLinesStore {
    async fn append(&self, athlete_id: &str, entry: LogEntry) -> LogResult<()> {
        let record = StoredRecord {
            timestamp: entry.timestamp,
            athlete_id: athlete_id.to_string(),
            body_part: entry.body_part,
            severity: entry.severity,
        };
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await?;

        let len = file.metadata().await?.len();
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::Start(len - 1)).await?;
            file.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                warn!(path = %self.path.display(), "log file ends mid-line; starting a new line");
                line.insert(0, b'\n');
            }
        }

        let written = async {
            file.write_all(&line).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            // Keep only whole records on disk.
            if let Err(trunc) = file.set_len(len).await {
                warn!(path = %self.path.display(), error = %trunc, "could not drop partial record");
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn entries(&self, athlete_id: &str) -> LogResult<Vec<LogEntry>> {
        let _guard = self.lock.lock().await;
        Ok(self
            .read_records()
            .await?
            .into_iter()
            .filter(|r| r.athlete_id == athlete_id)
            .map(|r| LogEntry {
                body_part: r.body_part,
                severity: r.severity,
                timestamp: r.timestamp,
            })
            .collect())
    }

    async fn athletes(&self) -> LogResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        let mut seen: Vec<String> = Vec::new();
        for rec in self.read_records().await? {
            if !seen.contains(&rec.athlete_id) {
                seen.push(rec.athlete_id);
            }
        }
        Ok(seen)
    }
}
