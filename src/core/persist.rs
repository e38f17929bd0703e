//! Persistence collaborator
//!
//! The core treats storage as an opaque key-value store of JSON documents:
//! `load(key)` and `save(key, value)`. The file-backed implementation keeps
//! one `<key>.json` per key under the data directory. No schema migration.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key under which the product collection is stored
pub const PRODUCTS_KEY: &str = "products";
/// Key under which the event log is stored
pub const EVENTS_KEY: &str = "events";
/// Key under which the undo snapshot stack is stored
pub const UNDO_KEY: &str = "undo";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read '{key}': {source}")]
    Read {
        key: String,
        source: std::io::Error,
    },

    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },

    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    #[error("stored data under '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
}

/// Opaque key-value storage for JSON documents
pub trait KvStore {
    fn load(&self, key: &str) -> Result<Option<Value>, PersistError>;
    fn save(&mut self, key: &str, value: &Value) -> Result<(), PersistError>;
}

/// One `<key>.json` file per key under a data directory
#[derive(Debug)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Open the store, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| PersistError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileKvStore {
    fn load(&self, key: &str) -> Result<Option<Value>, PersistError> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistError::Read {
                    key: key.to_string(),
                    source,
                })
            }
        };
        let value = serde_json::from_str(&text).map_err(|source| PersistError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<(), PersistError> {
        let text =
            serde_json::to_string_pretty(value).map_err(|source| PersistError::Encode {
                key: key.to_string(),
                source,
            })?;
        fs::write(self.path_for(key), text).map_err(|source| PersistError::Write {
            key: key.to_string(),
            source,
        })
    }
}

/// In-memory store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: HashMap<String, Value>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn load(&self, key: &str) -> Result<Option<Value>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }
}
