//! Key-value persistence
//!
//! The game persists two small values: the high score and the player's
//! settings. Both go through [`KeyValueStore`] so the session never touches
//! browser globals directly. On the web the store is LocalStorage
//! (`platform::storage`); tests and the native build use [`MemoryStore`].

use std::collections::HashMap;

use thiserror::Error;

/// Failure writing to a store
#[derive(Debug, Error)]
pub enum StorageError {
    /// No backing storage (private mode, storage disabled, read-only store)
    #[error("storage is not available")]
    Unavailable,
    /// The backend refused the write (quota exceeded, security error)
    #[error("storage rejected write to `{key}`: {reason}")]
    Rejected { key: String, reason: String },
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage
pub trait KeyValueStore {
    /// Read a value. Missing keys and read failures are both `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail with [`StorageError::Unavailable`]
    pub fn read_only() -> Self {
        Self {
            entries: HashMap::new(),
            read_only: true,
        }
    }

    /// Builder-style insert, bypassing the read-only flag
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Unavailable);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("a"), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_read_only_store() {
        let mut store = MemoryStore::read_only().with("a", "1");
        assert!(matches!(store.set("a", "2"), Err(StorageError::Unavailable)));
        assert_eq!(store.get("a").as_deref(), Some("1"));
    }
}
