//! Snapshot persistence.
//!
//! The gallery keeps its whole image map in a single serialized blob under one
//! key of a key-value store, the way a browser app would use local storage.
//! [`FileStore`] gives the CLI that shape on disk: one JSON object mapping keys
//! to string values.
//!
//! ## Snapshot shape
//!
//! ```json
//! { "agfi-2026": { "day1": ["https://..."], "day2": [] } }
//! ```
//!
//! Older single-event data stored the day map at the top level
//! (`{ "day1": [...] }`). Both shapes are accepted on read; only the keyed
//! shape is written. There is no version field. Anything that parses as
//! neither shape is treated as if the key were absent.

use crate::types::DayImages;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Full image map: event id → day slot → ordered links.
pub type Snapshot = BTreeMap<String, DayImages>;

/// A snapshot as found in storage, before it is applied to the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredSnapshot {
    /// Single-event day map; belongs to the first event in the catalog.
    Legacy(DayImages),
    Events(Snapshot),
}

/// Minimal string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value.
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON-file-backed store: `{ "key": "value", ... }`.
///
/// The file is read on every `get` and rewritten on every `set`. A missing
/// file reads as empty; parent directories are created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    /// A file that isn't a JSON object is replaced, losing its contents.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StoreError::Json(err)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "overwriting unparseable store file"
                );
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        entries.insert(key.to_string(), value);
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Read and parse the snapshot under `key`.
///
/// Returns `None` when the key is absent, the store can't be read, or the
/// value isn't a recognizable snapshot. Failures are logged, never returned.
pub fn load_snapshot(store: &impl KeyValueStore, key: &str) -> Option<StoredSnapshot> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, error = %err, "snapshot store unreadable, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding unparseable snapshot");
            None
        }
    }
}

/// Serialize the whole snapshot and write it under `key`.
pub fn save_snapshot(
    store: &mut impl KeyValueStore,
    key: &str,
    snapshot: &Snapshot,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(snapshot)?;
    store.set(key, json)?;
    tracing::info!(key, events = snapshot.len(), "snapshot written");
    Ok(())
}
