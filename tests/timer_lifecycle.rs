//! End-to-end timer lifecycle against a file-backed store

use std::sync::Arc;

use timer_board::{
    error::StorageError,
    state::{NewTimer, TimerId, TimerRegistry, TimerUpdate},
    storage::{FileStore, KeyValueStore, MemoryStore, TimerStorage},
};

fn focus(duration: u64) -> NewTimer {
    NewTimer {
        title: "Focus".to_string(),
        description: "deep work".to_string(),
        duration,
    }
}

fn file_registry(dir: &std::path::Path) -> (TimerRegistry, FileStore) {
    let store = FileStore::open(dir).unwrap();
    let storage = TimerStorage::new(Arc::new(store.clone()), "timers").unwrap();
    (TimerRegistry::load(storage), store)
}

#[test]
fn focus_timer_runs_to_completion_and_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (mut registry, _) = file_registry(dir.path());

    let id = registry.add(focus(5)).unwrap().id().clone();
    assert_eq!(registry.timers().len(), 1);
    assert!(registry.toggle(&id).unwrap().is_running());

    let mut completions = Vec::new();
    for tick in 1..=5 {
        let events = registry.tick();
        if tick < 5 {
            assert!(events.is_empty(), "unexpected completion on tick {}", tick);
        }
        completions.extend(events);
    }
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].id, id);

    let (reloaded, _) = file_registry(dir.path());
    let timer = reloaded.get(&id).unwrap();
    assert_eq!(timer.remaining_time(), 0);
    assert!(!timer.is_running());
    assert_eq!(timer.description(), "deep work");
}

#[test]
fn delete_of_unknown_id_leaves_stored_bytes_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let (mut registry, store) = file_registry(dir.path());
    registry.add(focus(60)).unwrap();
    registry.add(focus(120)).unwrap();
    let before = store.get("timers").unwrap().unwrap();

    assert!(!registry.delete(&TimerId::from("no-such-timer")));
    assert_eq!(store.get("timers").unwrap().unwrap(), before);
}

#[test]
fn corrupt_file_starts_empty_and_is_replaced_on_next_write() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("timers.json"), "{{{ definitely not json").unwrap();

    let (mut registry, store) = file_registry(dir.path());
    assert!(registry.timers().is_empty());

    registry.add(focus(10)).unwrap();
    let raw = store.get("timers").unwrap().unwrap();
    assert!(raw.starts_with('['));
}

#[test]
fn records_written_by_older_clients_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("timers.json"),
        r#"[{"id":"legacy","title":"Old","duration":90,"remainingTime":200,"isRunning":true,"color":"red"}]"#,
    )
    .unwrap();

    let (registry, _) = file_registry(dir.path());
    let timer = registry.get(&TimerId::from("legacy")).unwrap();
    assert_eq!(timer.description(), "");
    assert_eq!(timer.remaining_time(), 90);
    assert!(timer.is_running());
}

#[test]
fn edit_then_restart_keeps_bounds() {
    let store = Arc::new(MemoryStore::new());
    let mut registry = TimerRegistry::load(TimerStorage::new(store, "timers").unwrap());
    let id = registry.add(focus(10)).unwrap().id().clone();
    registry.toggle(&id);
    registry.tick();

    let edited = registry
        .edit(
            &id,
            TimerUpdate {
                duration: Some(3),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!((edited.duration(), edited.remaining_time(), edited.is_running()), (3, 3, false));

    registry.toggle(&id);
    for _ in 0..10 {
        registry.tick();
        let t = registry.get(&id).unwrap();
        assert!(t.remaining_time() <= t.duration());
    }
    assert_eq!(registry.restart(&id).unwrap().remaining_time(), 3);
}

struct QuotaExceeded;

impl KeyValueStore for QuotaExceeded {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }
}

#[test]
fn failed_writes_keep_memory_authoritative() {
    let storage = TimerStorage::new(Arc::new(QuotaExceeded), "timers").unwrap();
    let mut registry = TimerRegistry::load(storage);

    let id = registry.add(focus(2)).unwrap().id().clone();
    registry.toggle(&id);
    registry.tick();
    let events = registry.tick();

    assert_eq!(events.len(), 1);
    assert!(registry.get(&id).unwrap().is_completed());
}
