//! String key-value storage
//!
//! LocalStorage on the web, a JSON file natively, and an in-memory map for
//! tests and headless runs.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Why a storage operation failed
#[derive(Debug)]
pub enum StorageError {
    /// The backing store does not exist (no window, storage disabled)
    Unavailable,
    /// Reading or writing the backing file failed
    Io(std::io::Error),
    /// The backing file holds something other than a string map
    Serialize(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "storage unavailable"),
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
            StorageError::Serialize(e) => write!(f, "storage format error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Unavailable => None,
            StorageError::Io(e) => Some(e),
            StorageError::Serialize(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e)
    }
}

/// A string-keyed string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as a flat JSON object in one file.
///
/// The whole map is rewritten on every `set`; a missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Opened store {} ({} keys)", path.display(), values.len());
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("high").unwrap(), None);
        store.set("high", "1200").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("high").unwrap().as_deref(), Some("1200"));
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Serialize(_)));
        assert!(err.to_string().starts_with("storage format error"));
    }
}
