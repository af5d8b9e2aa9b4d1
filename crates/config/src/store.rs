// Persisted key-value storage
// File-backed store lives at ~/.config/excelpro/storage.json

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::ConfigError;

/// Small string key-value store, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
    fn remove(&mut self, key: &str) -> Result<(), ConfigError>;
}

/// In-process store; contents are lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ConfigError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// Every call re-reads the file so separate processes see each other's writes.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under the platform config dir
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("excelpro")
            .join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(&self.path, json).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!("storage unreadable: {e}");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), ConfigError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("a"), None);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").as_deref(), Some("1"));
        assert_eq!(reopened.get("b").as_deref(), Some("2"));

        store.remove("a").unwrap();
        assert_eq!(reopened.get("a"), None);
        assert_eq!(reopened.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("a"), None);
        assert!(matches!(store.set("a", "1"), Err(ConfigError::Parse { .. })));
    }
}
