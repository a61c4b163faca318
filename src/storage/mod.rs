//! Timer persistence
//!
//! The full collection is stored as one JSON array under a single key of a
//! local key-value store. Loading never fails: missing or corrupt data
//! degrades to an empty collection. Saving failures are logged and the
//! in-memory collection stays authoritative.

pub mod file_store;
pub mod memory_store;
pub mod record;

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::StorageError;
use crate::state::Timer;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use record::{decode_timers, encode_timers};

/// Minimal string key-value store used as the persistence backend
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Check that a key is usable as a store key and as a file name
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Loads and saves the timer collection under one named key
#[derive(Clone)]
pub struct TimerStorage {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl TimerStorage {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self { store, key })
    }

    /// Storage backed by a fresh in-memory store
    pub fn in_memory(key: impl Into<String>) -> Result<Self, StorageError> {
        Self::new(Arc::new(MemoryStore::new()), key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored collection, falling back to empty on any failure
    pub fn load(&self) -> Vec<Timer> {
        match self.store.get(&self.key) {
            Ok(Some(raw)) => {
                let timers = decode_timers(&raw);
                info!("Loaded {} timers from storage key '{}'", timers.len(), self.key);
                timers
            }
            Ok(None) => {
                debug!("No stored timers under '{}', starting empty", self.key);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read stored timers, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Write the full collection
    pub fn try_save(&self, timers: &[Timer]) -> Result<(), StorageError> {
        let raw = encode_timers(timers)?;
        self.store.set(&self.key, &raw)
    }

    /// Write the full collection, logging instead of propagating failures.
    /// Returns whether the write went through.
    pub fn save(&self, timers: &[Timer]) -> bool {
        match self.try_save(timers) {
            Ok(()) => {
                debug!("Persisted {} timers", timers.len());
                true
            }
            Err(e) => {
                error!("Failed to persist timers: {}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for TimerStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerStorage").field("key", &self.key).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{NewTimer, TimerId};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    fn sample(title: &str, duration: u64) -> Timer {
        Timer::new(
            TimerId::generate(),
            NewTimer {
                title: title.to_string(),
                description: format!("{title} description"),
                duration,
            },
            1_700_000_000_000,
        )
        .unwrap()
    }

    #[test]
    fn keys_are_validated() {
        assert!(validate_key("timers").is_ok());
        assert!(validate_key("timer-board_v1.backup").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("has space").is_err());
        assert!(TimerStorage::in_memory("a/b").is_err());
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let storage = TimerStorage::in_memory("timers").unwrap();
        let timers = vec![sample("b", 30), sample("a", 10), sample("c", 3600)];
        storage.try_save(&timers).unwrap();
        assert_eq!(storage.load(), timers);
    }

    #[test]
    fn missing_key_loads_empty() {
        let storage = TimerStorage::in_memory("timers").unwrap();
        assert!(storage.load().is_empty());
    }

    #[test]
    fn corrupt_payload_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set("timers", "[{\"id\":").unwrap();
        let storage = TimerStorage::new(store, "timers").unwrap();
        assert!(storage.load().is_empty());
    }

    #[test]
    fn backend_failures_do_not_propagate() {
        let storage = TimerStorage::new(Arc::new(BrokenStore), "timers").unwrap();
        assert!(storage.load().is_empty());
        assert!(!storage.save(&[sample("x", 1)]));
        assert!(storage.try_save(&[]).is_err());
    }
}
