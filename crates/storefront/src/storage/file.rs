//! JSON file storage backend.
//!
//! The whole store is one JSON object keyed by storage key. It is loaded once
//! on open and rewritten after every change (write to a sibling temp file,
//! then rename).

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use super::{StorageBackend, StorageError};

type Entries = BTreeMap<String, serde_json::Value>;

/// Write-through JSON file backend.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl FileBackend {
    /// Open the store at `path`.
    ///
    /// A missing file starts an empty store. An unreadable or corrupt file is
    /// logged and also starts empty; it is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load(&path) {
            Ok(entries) => {
                debug!(path = %path.display(), keys = entries.len(), "Loaded store");
                entries
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not load store, starting empty");
                Entries::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn save(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn load(path: &Path) -> Result<Entries, StorageError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
        Err(e) => Err(e.into()),
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value);
        self.save(&entries)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}
