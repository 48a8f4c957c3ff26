//! # Session Store
//!
//! A small persisted key-value store holding the session credential
//! (`token`) and the signed-in profile (`user`).
//!
//! The store is injected into [`ApiClient`](crate::ApiClient) rather than
//! reached through a global, so tests substitute [`MemorySessionStore`].
//!
//! ## Storage Layout (FileSessionStore)
//! ```text
//! session.json
//! {
//!   "token": "eyJhbGciOi...",
//!   "user":  "{\"id\":1,\"username\":\"ana\",\"roles\":[\"admin\"]}"
//! }
//! ```
//! Values are plain strings; `user` holds JSON text, exactly as written
//! by the login flow.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

use crate::error::SessionResult;

/// Key-value capability backing the auth helpers.
pub trait SessionStore: Send + Sync {
    /// Reads a value. Missing keys and unreadable storage both yield `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a value.
    fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    /// Removes a value. Removing a missing key is not an error.
    fn clear(&self, key: &str) -> SessionResult<()>;
}

// =============================================================================
// Memory Store
// =============================================================================

/// Ephemeral store for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with the given pairs.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MemorySessionStore {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> SessionResult<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// JSON-object store persisted at a path.
///
/// Every read goes to disk, so a login performed by another process is
/// picked up on the next request. A missing or corrupt file reads as empty.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    write_lock: std::sync::Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSessionStore {
            path: path.into(),
            write_lock: std::sync::Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Session file unreadable, treating as empty");
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = ?self.path, error = %e, "Session file corrupt, treating as empty");
            BTreeMap::new()
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, contents)?;
        debug!(path = ?self.path, keys = values.len(), "Session file written");
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all();
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn clear(&self, key: &str) -> SessionResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all();
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}
