//! In-memory storage backend.
//!
//! Non-persistent key-value storage on top of `DashMap`. Used as the
//! substitute for the standard store in tests and embedded setups.

use super::KvBackend;
use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory key-value storage backend using DashMap.
///
/// All data is lost when the process exits. Clones share the same map, so a
/// test can keep a handle to the backend it passed into a [`Store`](crate::Store)
/// and inspect raw bytes afterwards.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    data: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the store.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Clears all entries from the store.
    pub fn clear(&self) {
        self.data.clear();
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.data.remove(key).is_some())
    }

    fn keys(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let keys = self
            .data
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| prefix.is_none_or(|p| key.starts_with(p)))
            .collect();
        Ok(keys)
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.data.contains_key(key))
    }
}
