//! Storage backends.
//!
//! The store keeps one serialized payload per logical table, addressed by a
//! table key. [`StorageBackend`] is the only thing the rest of the crate
//! knows about persistence, so the medium can be swapped (files on disk,
//! memory for tests) without touching table code.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;

/// Key-value read/write primitive underneath the store.
///
/// Reads are non-raising by contract: any problem getting a key is logged
/// and reported as `None`, never surfaced to the caller. Writes fully
/// overwrite the previous value for the key.
pub trait StorageBackend {
    /// Fetch the payload stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite the payload stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Drop the payload stored under `key`. Removing a missing key is fine.
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed storage: one UTF-8 file per key inside a base directory.
#[derive(Debug)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Create a backend rooted at `base_dir`, creating the directory if
    /// needed.
    pub fn new(base_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(base_dir)?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "unreadable table file, treating as empty");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.set("bookings", "[1,2,3]").unwrap();
        assert_eq!(storage.get("bookings").as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn file_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        assert!(storage.get("payments").is_none());
    }

    #[test]
    fn file_set_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.set("accounts", "old").unwrap();
        storage.set("accounts", "new").unwrap();
        assert_eq!(storage.get("accounts").as_deref(), Some("new"));
    }

    #[test]
    fn file_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.set("messages", "x").unwrap();
        storage.remove("messages").unwrap();
        storage.remove("messages").unwrap();
        assert!(storage.get("messages").is_none());
    }

    #[test]
    fn memory_round_trip() {
        let storage = MemoryStorage::new();
        storage.set("accounts", "{}").unwrap();
        assert_eq!(storage.get("accounts").as_deref(), Some("{}"));

        storage.remove("accounts").unwrap();
        assert!(storage.get("accounts").is_none());
    }
}
