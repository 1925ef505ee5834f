use serde::Serialize;

use crate::PainLogStore;

#[derive(Debug, Serialize)]
pub struct Health {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Health {
    /// Ready when the store can be read.
    pub async fn readiness(store: &dyn PainLogStore) -> Self {
        match store.athletes().await {
            Ok(_) => Self {
                ready: true,
                detail: None,
            },
            Err(e) => Self {
                ready: false,
                detail: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonLinesStore, MemoryStore};

    #[tokio::test]
    async fn readiness_ok() {
        let h = Health::readiness(&MemoryStore::new()).await;
        assert!(h.ready);
    }

    #[tokio::test]
    async fn readiness_fails_on_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be read as a log file
        let h = Health::readiness(&JsonLinesStore::new(dir.path())).await;
        assert!(!h.ready);
        assert!(h.detail.is_some());
    }
}
