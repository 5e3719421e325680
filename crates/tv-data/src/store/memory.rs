//! In-memory store

use std::sync::atomic::{AtomicBool, Ordering};

use ahash::AHashMap;
use parking_lot::RwLock;

use super::KeyValueStore;
use crate::DataError;

/// Store backed by a hash map
///
/// `set_failing(true)` makes every operation fail, which stands in for a full
/// or disabled storage medium.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<AHashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn check(&self) -> Result<(), DataError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DataError::Unavailable("memory store is failing".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DataError> {
        self.check()?;
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DataError> {
        self.check()?;
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), DataError> {
        self.check()?;
        self.entries.write().remove(key);
        Ok(())
    }
}
