//! Durable key/value storage for the client session.
//!
//! Values are stored as raw strings under fixed keys, so a damaged value is
//! seen by the session as-is and can be discarded there.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ClientError;

/// Key/value store the session persists into.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// A JSON object on disk. A missing or unreadable file reads as empty.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<data dir>/texmage/session.json`, or `None` when the platform has no
    /// data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("texmage").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> BTreeMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(map)?)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), ClientError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_map();
        f(&mut map);
        self.write_map(&map)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.update(|map| {
            map.remove(key);
        })
    }
}

/// Process-local storage for tests and embedding.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
        Ok(())
    }
}
