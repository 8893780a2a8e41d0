//! Best-effort key/value persistence.
//!
//! [`KeyValueStore`] stores any serializable value under a string key,
//! wrapped with the time it was captured. It never fails: backend and
//! (de)serialization errors are logged and surface as a missing value or a
//! skipped write.
//!
//! # Backends
//!
//! - [`MemoryBackend`] - process-lifetime map (default, used by tests)
//! - [`FileBackend`] - write-through JSON file, survives restarts

mod file;
mod memory;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, error};

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Keys persisted by the storefront session.
pub mod keys {
    /// Currently selected roster user.
    pub const CURRENT_USER: &str = "currentUser";

    /// Cart collection for every user.
    pub const USER_CARTS: &str = "userCarts";

    /// Search term, category filter and sort selection.
    pub const DASHBOARD_FILTERS: &str = "dashboardFilters";

    /// Dashboard page and page size.
    pub const DASHBOARD_PAGINATION: &str = "dashboardPagination";

    /// Dark theme preference.
    pub const DARK_MODE: &str = "darkMode";
}

/// Errors raised by storage backends.
///
/// These never escape [`KeyValueStore`]; they are logged there.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Value could not be converted to or from JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A writer panicked while holding the store lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Raw JSON storage used by [`KeyValueStore`].
pub trait StorageBackend: Send + Sync {
    /// Read the raw entry stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be accessed.
    fn read(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError>;

    /// Delete the entry under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// A stored value together with its capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredValue<T> {
    pub value: T,
    /// Milliseconds since the Unix epoch when the value was written.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Shared, cloneable handle to a storage backend.
#[derive(Clone)]
pub struct KeyValueStore {
    backend: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for KeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyValueStore").finish_non_exhaustive()
    }
}

impl Default for KeyValueStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl KeyValueStore {
    /// Wrap an existing backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A store that lives for the process lifetime only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    /// A store backed by a JSON file at `path`.
    #[must_use]
    pub fn open_file(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(FileBackend::open(path))
    }

    /// Store `value` under `key` with the current time, overwriting any
    /// previous value. Failures are logged and the write is skipped.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let stored = StoredValue {
            value,
            timestamp: Utc::now(),
        };
        let result = serde_json::to_value(&stored)
            .map_err(StorageError::from)
            .and_then(|json| self.backend.write(key, json));

        match result {
            Ok(()) => debug!(key, "Stored value"),
            Err(e) => error!(key, error = %e, "Storage error"),
        }
    }

    /// Get the value stored under `key`, or `None` if it is missing or
    /// unreadable.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_entry(key).map(|stored| stored.value)
    }

    /// Get the value stored under `key` together with its capture time.
    #[must_use]
    pub fn get_entry<T: DeserializeOwned>(&self, key: &str) -> Option<StoredValue<T>> {
        let raw = match self.backend.read(key) {
            Ok(raw) => raw?,
            Err(e) => {
                error!(key, error = %e, "Storage error");
                return None;
            }
        };

        match serde_json::from_value(raw) {
            Ok(stored) => Some(stored),
            Err(e) => {
                error!(key, error = %e, "Storage error");
                None
            }
        }
    }

    /// Delete the value under `key`. Idempotent; failures are logged.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.delete(key) {
            error!(key, error = %e, "Storage error");
        }
    }
}
