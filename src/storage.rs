use std::collections::HashMap;

use crate::StorageError;

/// String key-value store used for everything the app persists locally.
///
/// In the browser this is backed by `localStorage`, natively by the host
/// application's storage file.
pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns [`StorageError`] when the value could not be written.
    fn set_string(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-memory store. Used when the host has no persistence and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.data.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }
}
