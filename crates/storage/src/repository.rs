use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the browser-style local store.
///
/// Values are opaque strings addressed by key; a write replaces the whole
/// value, so readers never observe a partial update.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key starting with `prefix`; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove_prefix(&self, prefix: &str) -> Result<u64, StorageError>;

    /// List stored keys in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<u64, StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|key, _| !key.starts_with(prefix));
        Ok(u64::try_from(before - guard.len()).unwrap_or(u64::MAX))
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.keys().cloned().collect())
    }
}

/// Aggregates the store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub local: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let local: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self { local }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_replaces_and_remove_is_idempotent() {
        let store = InMemoryStore::new();
        store.set("theme", "dark").await.unwrap();
        store.set("theme", "light").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("light"));

        store.remove("theme").await.unwrap();
        store.remove("theme").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_prefix_only_touches_matching_keys() {
        let store = InMemoryStore::new();
        store.set("quizTaken_1", "true").await.unwrap();
        store.set("quizTaken_2", "true").await.unwrap();
        store.set("quizSubmitted", "true").await.unwrap();

        let removed = store.remove_prefix("quizTaken_").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.keys().await.unwrap(), vec!["quizSubmitted".to_string()]);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.local.set("k", "v").await.unwrap();
        assert_eq!(other.local.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
