//! Durable key-value storage adapter.
//!
//! # Design
//! - Backends only move raw strings; JSON encoding lives in [`PersistentStore`].
//! - Reads fall back to the caller's default and writes swallow failures, so
//!   watched-state bookkeeping can never break page interaction.
//! - No locking: concurrent tabs race and the last write wins.

use crate::error::StorageError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::warn;

/// Raw string storage shared by every page of the same origin.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the raw value stored under `key`.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key` if present.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store. Used by tests and as the fallback when the browser
/// refuses access to its durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// JSON-encoding adapter over a [`KeyValueStore`] backend.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Rc<dyn KeyValueStore>,
}

impl fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}

impl PersistentStore {
    /// Wrap a backend.
    #[must_use]
    pub const fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Decode the JSON value stored under `key`, or return `default` when the
    /// key is absent, the backend is unavailable, or the payload is corrupt.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.get_text(key) else {
            return default;
        };
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "discarding unparseable stored value");
                default
            }
        }
    }

    /// Encode `value` as JSON and store it under `key`. Failures are logged
    /// and dropped.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_text(key, &raw),
            Err(err) => warn!(key, error = %err, "failed to encode value for storage"),
        }
    }

    /// Raw string stored under `key`, if it can be read.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "storage read failed");
                None
            }
        }
    }

    /// Store a raw string under `key`. Failures are logged and dropped.
    pub fn set_text(&self, key: &str, value: &str) {
        if let Err(err) = self.backend.set(key, value) {
            warn!(key, error = %err, "storage write failed");
        }
    }

    /// Delete `key`. Failures are logged and dropped.
    pub fn remove(&self, key: &str) {
        if let Err(err) = self.backend.remove(key) {
            warn!(key, error = %err, "storage delete failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded {
                key: key.to_string(),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn get_returns_default_for_missing_key() {
        let store = PersistentStore::new(Rc::new(MemoryStore::new()));
        assert_eq!(store.get::<Vec<usize>>("absent", vec![7]), vec![7]);
    }

    #[test]
    fn get_returns_default_for_corrupt_payload() {
        let backend = Rc::new(MemoryStore::new());
        backend.set("watchedMovies", "[1, 2,").unwrap();
        let store = PersistentStore::new(backend);
        assert!(store.get::<Vec<usize>>("watchedMovies", Vec::new()).is_empty());
    }

    #[test]
    fn set_then_get_round_trips_json() {
        let store = PersistentStore::new(Rc::new(MemoryStore::new()));
        store.set("watchedMovies", &vec![3_usize, 1]);
        assert_eq!(
            store.get::<Vec<usize>>("watchedMovies", Vec::new()),
            vec![3, 1]
        );
        assert_eq!(store.get_text("watchedMovies").as_deref(), Some("[3,1]"));
    }

    #[test]
    fn broken_backend_never_surfaces_errors() {
        let store = PersistentStore::new(Rc::new(BrokenStore));
        store.set("watchedMovies", &vec![1_usize]);
        store.set_text("theme", "dark");
        store.remove("theme");
        assert_eq!(store.get::<Vec<usize>>("watchedMovies", vec![9]), vec![9]);
        assert_eq!(store.get_text("theme"), None);
    }

    #[test]
    fn remove_deletes_key() {
        let backend = Rc::new(MemoryStore::new());
        let store = PersistentStore::new(backend.clone());
        store.set_text("theme", "oled");
        assert_eq!(backend.len(), 1);
        store.remove("theme");
        assert!(backend.is_empty());
    }
}
