use routinely_core::engine::records;
use routinely_core::store::{DocumentStore, FileBackend, LoadOutcome, MemoryBackend};
use routinely_core::{AppDocument, TaskCompletion, DATA_VERSION};

#[test]
fn first_run_seeds_and_persists() {
    let mut store = DocumentStore::new(MemoryBackend::new());
    let (doc, outcome) = store.load();

    assert_eq!(outcome, LoadOutcome::SeededFirstRun);
    assert_eq!(doc, AppDocument::seeded());
    assert!(store.backend().payload().is_some());
}

#[test]
fn save_then_load_round_trips_the_document() {
    let doc = AppDocument::seeded();
    let doc = records::add_completion(
        &doc,
        TaskCompletion {
            kid_id: "1".to_string(),
            task_id: "m1".to_string(),
            date: "2026-08-06".to_string(),
            time_in_seconds: 17,
            completed_at: "2026-08-06T07:15:00.000Z".to_string(),
        },
    )
    .unwrap();

    let mut store = DocumentStore::new(MemoryBackend::new());
    store.save(&doc).unwrap();

    let payload = store.backend().payload().unwrap().to_string();
    let mut reopened = DocumentStore::new(MemoryBackend::with_payload(payload));
    let (loaded, outcome) = reopened.load();

    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(loaded, doc);
}

#[test]
fn outdated_version_is_reset_to_the_seed() {
    let backend = MemoryBackend::with_payload(r#"{"version": 0, "kids": []}"#);
    let mut store = DocumentStore::new(backend);
    let (doc, outcome) = store.load();

    assert_eq!(outcome, LoadOutcome::SeededVersionReset { found: 0 });
    assert_eq!(doc, AppDocument::seeded());
    // The reset is persisted immediately.
    let stored: AppDocument =
        serde_json::from_str(store.backend().payload().unwrap()).unwrap();
    assert_eq!(stored, AppDocument::seeded());
}

#[test]
fn newer_version_serves_the_seed_without_touching_storage() {
    let payload = format!(r#"{{"version": {}}}"#, DATA_VERSION + 1);
    let mut store = DocumentStore::new(MemoryBackend::with_payload(payload.clone()));
    let (doc, outcome) = store.load();

    assert_eq!(
        outcome,
        LoadOutcome::NewerVersion {
            found: DATA_VERSION + 1
        }
    );
    assert_eq!(doc, AppDocument::seeded());
    assert_eq!(store.backend().payload(), Some(payload.as_str()));
}

#[test]
fn corrupt_payload_falls_back_and_is_left_in_place() {
    let mut store = DocumentStore::new(MemoryBackend::with_payload("{definitely not json"));
    let (doc, outcome) = store.load();

    assert_eq!(outcome, LoadOutcome::SeededAfterError);
    assert_eq!(doc, AppDocument::seeded());
    assert_eq!(store.backend().payload(), Some("{definitely not json"));
}

#[test]
fn legacy_routine_type_payload_is_migrated_and_persisted() {
    let payload = format!(
        r#"{{
            "version": {DATA_VERSION},
            "kids": [{{"id": "1", "name": "Child 1", "color": "bg-blue-500", "avatar": "👦"}}],
            "tasks": [
                {{"id": "m1", "name": "Go to the toilet", "icon": "🚽", "routineType": "morning", "order": 1}}
            ],
            "completions": [],
            "personalRecords": [],
            "worldRecords": [],
            "activeTimers": []
        }}"#
    );
    let mut store = DocumentStore::new(MemoryBackend::with_payload(payload));
    let (doc, outcome) = store.load();

    assert_eq!(outcome, LoadOutcome::Migrated);
    assert_eq!(doc.routines.len(), 2);
    assert_eq!(doc.tasks[0].routine_id, "morning");

    // The upgraded shape is written back: a second load is a plain load.
    let upgraded = store.backend().payload().unwrap().to_string();
    assert!(!upgraded.contains("routineType"));
    let mut reopened = DocumentStore::new(MemoryBackend::with_payload(upgraded));
    let (again, outcome) = reopened.load();
    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(again, doc);
}

#[test]
fn file_backend_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routinely.json");

    let mut store = DocumentStore::new(FileBackend::new(&path));
    let (first, outcome) = store.load();
    assert_eq!(outcome, LoadOutcome::SeededFirstRun);
    assert!(path.is_file());

    let mut reopened = DocumentStore::new(FileBackend::new(&path));
    let (second, outcome) = reopened.load();
    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(second, first);
}

#[test]
fn file_backend_reports_missing_file_as_empty() {
    use routinely_core::store::StorageBackend;

    let dir = tempfile::tempdir().unwrap();
    let backend = FileBackend::new(dir.path().join("absent.json"));
    assert!(backend.read().unwrap().is_none());
}
