//! Single-document file store.
//!
//! The whole keyspace is one JSON object (`{"PRO12": "{...}", ...}`) loaded
//! at open and rewritten on every `put`. Rewrites go through a temp file in
//! the same directory followed by a rename, so a crash mid-write leaves the
//! previous document intact. Values must be UTF-8.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::EntityStore;

/// File-backed entity store for the command-line tool.
#[derive(Debug)]
pub struct FileEntityStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
    read_only: bool,
}

impl FileEntityStore {
    /// Open (or lazily create) the store document at `path`.
    ///
    /// A missing file is an empty store; it is created on the first `put`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::open_inner(path, false)
    }

    /// Open an existing document without allowing writes.
    pub fn open_read_only(path: &Path) -> StoreResult<Self> {
        Self::open_inner(path, true)
    }

    fn open_inner(path: &Path, read_only: bool) -> StoreResult<Self> {
        let entries = if path.exists() {
            let text = fs::read_to_string(path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), read_only, "store opened");
        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
            read_only,
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored keys in sorted order.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.keys().cloned().collect())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let document = serde_json::to_vec_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&document)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl EntityStore for FileEntityStore {
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let text = std::str::from_utf8(value)
            .map_err(|e| StoreError::Serialization(format!("value for {key} is not UTF-8: {e}")))?;

        let mut map = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        let previous = map.insert(key.to_string(), text.to_string());
        if let Err(e) = self.persist(&map) {
            // Keep memory consistent with disk.
            match previous {
                Some(old) => map.insert(key.to_string(), old),
                None => map.remove(key),
            };
            return Err(e);
        }
        debug!(key, len = value.len(), "store put");
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .get(key)
            .filter(|v| !v.is_empty())
            .map(|v| v.as_bytes().to_vec()))
    }
}
