use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::RwLock;

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<HashMap<String, String>>,
    /// Keys whose writes fail, to exercise error paths.
    failing: RwLock<HashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. with legacy or corrupt data.
    pub fn with_entry(self, key: &str, value: impl Into<String>) -> Self {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    /// Make every later `set`/`remove` of `key` fail with an io error.
    pub fn fail_writes(&self, key: &str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(key.to_string());
        }
    }

    fn check_writable(&self, key: &str) -> Result<(), StoreError> {
        let failing = self.failing.read().map_err(|_| StoreError::Poisoned)?;
        if failing.contains(key) {
            return Err(StoreError::Io {
                key: key.to_string(),
                source: io::Error::other("write refused"),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable(key)?;
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable(key)?;
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.remove(key);
        Ok(())
    }
}
