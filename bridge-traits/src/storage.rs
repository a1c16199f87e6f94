//! Session Storage Abstraction
//!
//! A string key/value slot store used to persist store snapshots across
//! restarts of the host:
//! - Web: `sessionStorage` / `localStorage`
//! - Desktop: in-memory map or a JSON file
//! - Tests: in-memory map

use crate::error::Result;

/// Key-value session storage trait
///
/// Calls are synchronous, matching the browser storage API; store updates
/// write through on every change and must not suspend.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SessionStorage;
///
/// fn remember(storage: &dyn SessionStorage) -> Result<()> {
///     storage.set_item("theme", "\"dark\"")?;
///     Ok(())
/// }
/// ```
pub trait SessionStorage: Send + Sync {
    /// Retrieve the value stored under `key`
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Check if a key exists
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key)?.is_some())
    }
}
