//! Key-value storage providers.
//!
//! The store layer treats durable storage as a single-writer string
//! key-value interface. `MemoryStore` backs tests; `FileStore` backs the
//! CLI with one file per key under a root directory.

use crate::StoreResult;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub trait StorageProvider: Send {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// In-memory provider, the test substitute for real browser/disk storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl StorageProvider for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed provider: `<root>/<key>.json` per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    root_dir: PathBuf,
}

impl FileStore {
    pub fn new(root_dir: PathBuf) -> StoreResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{key}.json"))
    }
}

impl StorageProvider for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("data")).unwrap();
        assert_eq!(store.get("calculator-history").unwrap(), None);

        store.set("calculator-history", "[]").unwrap();
        assert_eq!(
            store.get("calculator-history").unwrap().as_deref(),
            Some("[]")
        );
        assert!(dir.path().join("data/calculator-history.json").exists());

        store.remove("calculator-history").unwrap();
        assert_eq!(store.get("calculator-history").unwrap(), None);
        // Removing a missing key is not an error.
        store.remove("calculator-history").unwrap();
    }
}
