use chrono::{TimeZone, Utc};
use rusqlite::Connection;
use serde_json::json;
use taskboard_core::db::migrations::{latest_version, schema_version};
use taskboard_core::db::{open_db, open_db_in_memory, DbError};
use taskboard_core::persistence::{decode_tasks, encode_tasks};
use taskboard_core::{
    FileSlotStorage, LoadOutcome, PersistenceAdapter, Priority, SlotStorage, SqliteSlotStorage,
    StorageError, StoreConfig, Task, TaskStore,
};
use uuid::Uuid;

fn sample_tasks() -> Vec<Task> {
    let mut done = Task::new("Pay rent", "before the 5th", Priority::High);
    done.completed = true;
    vec![Task::new("Buy milk", "", Priority::Medium), done]
}

#[test]
fn json_round_trip_reproduces_collections() {
    for tasks in [Vec::new(), sample_tasks()] {
        let encoded = encode_tasks(&tasks).unwrap();
        assert_eq!(decode_tasks(&encoded).unwrap(), tasks);
    }
}

#[test]
fn sub_millisecond_timestamps_survive_round_trip() {
    let created_at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
    let mut task = Task::new("Buy milk", "", Priority::Low);
    task.created_at = created_at;

    let encoded = encode_tasks(std::slice::from_ref(&task)).unwrap();
    assert!(encoded.contains("2023-11-14T22:13:20.123456789Z"));
    assert_eq!(decode_tasks(&encoded).unwrap(), vec![task]);
}

#[test]
fn loaded_microsecond_timestamps_are_rewritten_unchanged() {
    let payload = json!([{
        "id": "0b4f3c1e-6a55-4d2b-9a57-7c1f0f0f1a2b",
        "title": "Pay rent",
        "description": "",
        "completed": false,
        "createdAt": "2024-02-29T23:59:59.123456Z",
        "priority": "high"
    }])
    .to_string();

    let loaded = decode_tasks(&payload).unwrap();
    let reencoded = encode_tasks(&loaded).unwrap();
    assert!(reencoded.contains("\"createdAt\":\"2024-02-29T23:59:59.123456Z\""));
    assert_eq!(decode_tasks(&reencoded).unwrap(), loaded);
}

#[test]
fn wire_format_matches_slot_schema() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    let task = Task::with_id(id, "Buy milk", "2 liters", Priority::Low, created_at);

    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "Buy milk",
            "description": "2 liters",
            "completed": false,
            "createdAt": "2024-05-01T09:30:00.000Z",
            "priority": "low"
        })
    );
}

#[test]
fn decodes_payloads_written_by_browser_clients() {
    let payload = json!([{
        "id": "0b4f3c1e-6a55-4d2b-9a57-7c1f0f0f1a2b",
        "title": "Water plants",
        "description": "",
        "completed": true,
        "createdAt": "2024-02-29T23:59:59.123Z",
        "priority": "high"
    }]);

    let tasks = decode_tasks(&payload.to_string()).unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].completed);
    assert_eq!(tasks[0].priority, Priority::High);

    let reencoded: serde_json::Value =
        serde_json::from_str(&encode_tasks(&tasks).unwrap()).unwrap();
    assert_eq!(reencoded, payload);
}

#[test]
fn decode_rejects_unknown_priority() {
    let raw = json!([{
        "id": "0b4f3c1e-6a55-4d2b-9a57-7c1f0f0f1a2b",
        "title": "x",
        "description": "",
        "completed": false,
        "createdAt": "2024-02-29T23:59:59.123Z",
        "priority": "urgent"
    }])
    .to_string();
    assert!(decode_tasks(&raw).is_err());
}

#[test]
fn file_backend_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = sample_tasks();

    let storage = FileSlotStorage::new(dir.path()).unwrap();
    let (mut store, outcome) = TaskStore::open(PersistenceAdapter::with_default_slot(storage));
    assert!(matches!(outcome, LoadOutcome::Empty));
    for task in &tasks {
        store.add(task.clone()).unwrap();
    }
    let storage = store.close();
    assert!(storage.slot_path("tasks").unwrap().exists());

    let reopened = FileSlotStorage::new(dir.path()).unwrap();
    let (store, outcome) = TaskStore::open(PersistenceAdapter::with_default_slot(reopened));
    assert!(matches!(outcome, LoadOutcome::Restored { task_count: 2 }));
    assert_eq!(store.tasks(), tasks.as_slice());
}

#[test]
fn file_backend_leaves_no_temp_files_and_rejects_bad_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileSlotStorage::new(dir.path()).unwrap();
    storage.write_slot("tasks", "[]").unwrap();
    storage.write_slot("tasks", "[ ]").unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["tasks.json".to_string()]);
    assert_eq!(storage.read_slot("tasks").unwrap().as_deref(), Some("[ ]"));
    assert_eq!(storage.read_slot("other").unwrap(), None);

    let err = storage.write_slot("../escape", "[]").unwrap_err();
    assert!(matches!(err, StorageError::InvalidKey(_)));
}

#[test]
fn failed_file_write_cleans_up_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileSlotStorage::new(dir.path()).unwrap();
    let blocker = storage.slot_path("tasks").unwrap();
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), "x").unwrap();

    let err = storage.write_slot("tasks", "[]").unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["tasks.json".to_string()]);
}

#[test]
fn sqlite_backend_persists_across_reopen_with_custom_slot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskboard.db");
    let config = StoreConfig::new("work").unwrap();
    let tasks = sample_tasks();

    let storage = SqliteSlotStorage::open(&path).unwrap();
    let (mut store, _) = TaskStore::open(PersistenceAdapter::new(storage, config.clone()));
    for task in &tasks {
        store.add(task.clone()).unwrap();
    }
    store.close();

    let reopened = SqliteSlotStorage::open(&path).unwrap();
    assert_eq!(reopened.read_slot("tasks").unwrap(), None);
    let (store, outcome) = TaskStore::open(PersistenceAdapter::new(reopened, config));
    assert!(matches!(outcome, LoadOutcome::Restored { task_count: 2 }));
    assert_eq!(store.tasks(), tasks.as_slice());
}

#[test]
fn sqlite_write_overwrites_slot() {
    let mut storage = SqliteSlotStorage::in_memory().unwrap();
    storage.write_slot("tasks", "[1]").unwrap();
    storage.write_slot("tasks", "[2]").unwrap();
    assert_eq!(storage.read_slot("tasks").unwrap().as_deref(), Some("[2]"));

    let conn = storage.into_connection();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn migrations_apply_once_and_reject_newer_schemas() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slots.db");
    drop(open_db(&path).unwrap());
    let again = open_db(&path).unwrap();
    assert_eq!(schema_version(&again).unwrap(), latest_version());
    drop(again);

    let future = dir.path().join("future.db");
    let conn = Connection::open(&future).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&future).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}
