//! Persistent key-value boundary
//!
//! LocalStorage on the web, an in-memory map for native builds and
//! tests. The backend may be absent or reject writes (quota); callers
//! treat both as non-fatal.

use std::collections::HashMap;

use thiserror::Error;

/// LocalStorage key for the serialized task list.
pub const TASKS_KEY: &str = "TodoApp";
/// LocalStorage key for the persisted theme literal.
pub const THEME_KEY: &str = "TodoApp.theme";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("write rejected: {0}")]
    WriteRejected(String),
}

/// Key-value storage as the core sees it: text in, text out, writes may
/// fail.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory backend for native builds and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage backend (WASM only).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn backend() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::backend().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::backend().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::WriteRejected(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get(TASKS_KEY), None);
        storage.set(TASKS_KEY, "[]").unwrap();
        assert_eq!(storage.get(TASKS_KEY), Some("[]".to_string()));
    }

    #[test]
    fn test_memory_storage_keys_independent() {
        let mut storage = MemoryStorage::new();
        storage.set(TASKS_KEY, "[]").unwrap();
        storage.set(THEME_KEY, "dark").unwrap();
        assert_eq!(storage.get(TASKS_KEY), Some("[]".to_string()));
        assert_eq!(storage.get(THEME_KEY), Some("dark".to_string()));
    }
}
