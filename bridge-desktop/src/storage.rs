//! Session Storage implementations
//!
//! - [`MemorySessionStorage`]: lives as long as the process, like a browser
//!   tab's `sessionStorage`.
//! - [`FileSessionStorage`]: a single JSON object on disk, surviving restarts.

use bridge_traits::{
    error::{BridgeError, Result},
    storage::SessionStorage,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

fn lock_items(
    items: &Mutex<HashMap<String, String>>,
) -> Result<MutexGuard<'_, HashMap<String, String>>> {
    items
        .lock()
        .map_err(|_| BridgeError::Storage("Session storage lock poisoned".to_string()))
}

/// Process-local session storage
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(lock_items(&self.items)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        lock_items(&self.items)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        lock_items(&self.items)?.remove(key);
        Ok(())
    }
}

/// JSON-file backed session storage
///
/// The whole map is kept in memory and rewritten on every change.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    items: Mutex<HashMap<String, String>>,
}

impl FileSessionStorage {
    /// Open (or create) the storage file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(BridgeError::Io)?;
            }
        }

        let items = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(BridgeError::Io)?;
            if raw.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| {
                    BridgeError::Storage(format!(
                        "Corrupt session storage file {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
        } else {
            HashMap::new()
        };

        debug!(path = ?path, keys = items.len(), "Opened session storage file");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, items: &HashMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(items)
            .map_err(|e| BridgeError::Storage(format!("Failed to encode storage: {}", e)))?;
        fs::write(&self.path, raw).map_err(BridgeError::Io)
    }
}

impl SessionStorage for FileSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(lock_items(&self.items)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = lock_items(&self.items)?;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = lock_items(&self.items)?;
        if items.remove(key).is_some() {
            self.persist(&items)?;
        }
        Ok(())
    }
}
