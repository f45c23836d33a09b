//! In-memory store using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::PersistenceAdapter;
use crate::error::PersistError;

/// An in-memory store backed by a concurrent hash map.
///
/// Data is lost when the process exits. Useful for tests and for sessions
/// where durable storage is unavailable.
///
/// # Example
///
/// ```
/// use opsgrid_lib::persist::MemoryStore;
///
/// let store = MemoryStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    store: DashMap<String, String>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Creates a store pre-filled with entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = DashMap::new();
        for (key, value) in entries {
            store.insert(key.into(), value.into());
        }
        Self { store }
    }

    /// Returns a copy of the stored value, bypassing the async interface.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.store.get(key).map(|v| v.value().clone())
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistError> {
        self.store.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.store.remove(key);
        Ok(())
    }
}
