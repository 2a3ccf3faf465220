//! Byte-level storage backends.
//!
//! Accessors never talk to storage directly; they go through a [`KvBackend`]
//! held by a [`Store`](crate::Store). Two backends ship with the crate:
//!
//! - **RedbBackend**: Persistent storage with ACID guarantees (the standard store)
//! - **MemoryBackend**: Fast, non-persistent storage (ideal for tests)
//!
//! # Custom Backends
//!
//! Implement the `KvBackend` trait to use custom storage:
//!
//! ```ignore
//! use kvprop::{KvBackend, Store};
//!
//! struct SqliteBackend { /* ... */ }
//! impl KvBackend for SqliteBackend { /* ... */ }
//!
//! let store = Store::custom(SqliteBackend::new());
//! ```

mod memory;
mod redb;


pub use memory::MemoryBackend;
pub use self::redb::RedbBackend;

use anyhow::Result;

/// Backend trait for flat key-value storage.
///
/// Keys are strings, values are opaque byte blobs. All backends must be
/// thread-safe (`Send + Sync`); the typed layer performs no locking of its
/// own and relies on each operation being atomic at the backend.
///
/// # Example
///
/// ```ignore
/// use kvprop::{KvBackend, MemoryBackend};
///
/// let backend = MemoryBackend::new();
/// backend.set("key", b"value".to_vec())?;
/// let value = backend.get("key")?;
/// ```
pub trait KvBackend: Send + Sync + 'static {
    /// Retrieves the bytes stored under `key`.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Deletes a key.
    ///
    /// Returns `Ok(true)` if the key existed and was removed,
    /// `Ok(false)` if it didn't exist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Lists all keys, optionally restricted to those starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn keys(&self, prefix: Option<&str>) -> Result<Vec<String>>;

    /// Checks if a key exists.
    ///
    /// Default implementation uses `get()`, but backends may override
    /// for efficiency.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
