use history_map::{KeyValueStore, StorageError};

/// [`KeyValueStore`] over eframe's storage: `localStorage` in the browser, a
/// RON file natively. Every write is flushed.
pub struct EframeStore<'a> {
    storage: &'a mut dyn eframe::Storage,
}

impl<'a> EframeStore<'a> {
    pub fn new(storage: &'a mut dyn eframe::Storage) -> Self {
        Self { storage }
    }
}

impl KeyValueStore for EframeStore<'_> {
    fn get_string(&self, key: &str) -> Option<String> {
        self.storage.get_string(key)
    }

    fn set_string(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.storage.set_string(key, value);
        self.storage.flush();
        Ok(())
    }
}

/// Read-only view used at startup, where eframe only hands out `&dyn Storage`.
pub struct EframeReader<'a> {
    storage: &'a dyn eframe::Storage,
}

impl<'a> EframeReader<'a> {
    pub fn new(storage: &'a dyn eframe::Storage) -> Self {
        Self { storage }
    }
}

impl KeyValueStore for EframeReader<'_> {
    fn get_string(&self, key: &str) -> Option<String> {
        self.storage.get_string(key)
    }

    fn set_string(&mut self, _: &str, _: String) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}
