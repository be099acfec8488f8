//! Key-value store abstraction
//!
//! The gateway only needs named string entries that are read once at
//! startup and overwritten whole on every change.

use std::collections::HashMap;

use super::error::StorageResult;

/// A durable map of named string entries
pub trait KeyValueStore {
    /// Read an entry, `None` if it was never written
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace an entry with a new value
    fn put(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete an entry; deleting a missing entry is not an error
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).put(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// In-memory store, for tests and embedding
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get("user_name").unwrap().is_none());

        store.put("user_name", "Alex").unwrap();
        assert_eq!(store.get("user_name").unwrap().as_deref(), Some("Alex"));

        store.put("user_name", "Sam").unwrap();
        assert_eq!(store.get("user_name").unwrap().as_deref(), Some("Sam"));
        assert_eq!(store.len(), 1);

        store.remove("user_name").unwrap();
        store.remove("user_name").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.put("library", "[]").unwrap();
        assert_eq!(store.get("library").unwrap().as_deref(), Some("[]"));
    }
}
