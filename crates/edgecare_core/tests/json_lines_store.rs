use chrono::{TimeZone, Utc};
use edgecare_core::{JsonLinesStore, LogEntry, PainLogStore};

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonLinesStore::new(dir.path().join("pain.jsonl"));
    assert!(store.entries("p1").await.unwrap().is_empty());
    assert!(store.athletes().await.unwrap().is_empty());
}

#[tokio::test]
async fn appends_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pain.jsonl");
    let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2026, 3, 3, 8, 0, 0).unwrap();

    {
        let store = JsonLinesStore::new(&path);
        store
            .append("p1", LogEntry::pain("Left Knee", 6, t0))
            .await
            .unwrap();
        store.append("p2", LogEntry::no_pain(t0)).await.unwrap();
        store.append("p1", LogEntry::no_pain(t1)).await.unwrap();
    }

    let store = JsonLinesStore::new(&path);
    let p1 = store.entries("p1").await.unwrap();
    assert_eq!(
        p1,
        vec![LogEntry::pain("Left Knee", 6, t0), LogEntry::no_pain(t1)]
    );
    assert_eq!(store.athletes().await.unwrap(), vec!["p1", "p2"]);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 3);
    assert!(raw.lines().nth(1).unwrap().contains("\"severity\":null"));
}

#[tokio::test]
async fn unreadable_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pain.jsonl");
    let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();

    let store = JsonLinesStore::new(&path);
    store
        .append("p1", LogEntry::pain("Chest", 2, t0))
        .await
        .unwrap();
    let mut raw = std::fs::read_to_string(&path).unwrap();
    raw.push_str("\nnot json at all\n{\"timestamp\":\"2026-03-0");
    std::fs::write(&path, raw).unwrap();

    let entries = store.entries("p1").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].body_part, "Chest");
}

#[tokio::test]
async fn concurrent_appends_each_land_on_their_own_line() {
    let dir = tempfile::tempdir().unwrap();
    let store = std::sync::Arc::new(JsonLinesStore::new(dir.path().join("pain.jsonl")));
    let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();

    let mut handles = Vec::new();
    for i in 0..20u8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .append("p1", LogEntry::pain("Chest", 1 + i % 10, t0))
                .await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }
    assert_eq!(store.entries("p1").await.unwrap().len(), 20);
}

#[tokio::test]
async fn append_after_torn_line_is_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pain.jsonl");
    let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();

    let store = JsonLinesStore::new(&path);
    store
        .append("p1", LogEntry::pain("Chest", 2, t0))
        .await
        .unwrap();
    // crash mid-write: a partial record with no trailing newline
    let mut raw = std::fs::read_to_string(&path).unwrap();
    raw.push_str("{\"timestamp\":\"2026-03-0");
    std::fs::write(&path, raw).unwrap();

    store
        .append("p1", LogEntry::pain("Left Knee", 7, t0))
        .await
        .unwrap();

    let entries = store.entries("p1").await.unwrap();
    assert_eq!(
        entries,
        vec![
            LogEntry::pain("Chest", 2, t0),
            LogEntry::pain("Left Knee", 7, t0)
        ]
    );
    assert!(std::fs::read_to_string(&path).unwrap().ends_with('\n'));
}
