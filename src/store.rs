//! `Store` handle over a shared backend, and the process-wide standard store.

use crate::accessor::Accessor;
use crate::backend::{KvBackend, MemoryBackend, RedbBackend};
use crate::config::{BackendKind, StoreConfig};
use crate::optional::OptionalAccessor;
use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

static STANDARD: OnceLock<Store> = OnceLock::new();

/// Handle to a flat key-value backend.
///
/// Wraps a `KvBackend` implementation behind an `Arc`, so clones are cheap and
/// all of them (and every accessor built from them) see the same data.
///
/// # Example
///
/// ```ignore
/// use kvprop::Store;
///
/// let store = Store::memory();
/// let age = store.accessor("age", 0u32);
/// age.set(42);
/// assert_eq!(age.get(), 42);
/// ```
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KvBackend>,
}

impl Store {
    /// Creates a store backed by a redb database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let backend = RedbBackend::open(path)?;
        Ok(Self::custom(backend))
    }

    /// Creates a store backed by process memory.
    pub fn memory() -> Self {
        Self::custom(MemoryBackend::new())
    }

    /// Creates a store over a custom backend.
    pub fn custom<B: KvBackend>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Opens the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, or if the file
    /// backend cannot be opened.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let validation = config.validate()?;
        for warning in &validation.warnings {
            warn!("{warning}");
        }

        match config.backend {
            BackendKind::Memory => Ok(Self::memory()),
            BackendKind::File => {
                let path = config.resolved_path()?;
                let store = Self::file(&path)?;
                info!(path = %path.display(), "Opened store");
                Ok(store)
            },
        }
    }

    /// Returns the process-wide standard store.
    ///
    /// Unless [`Store::install_standard`] ran first, the first call opens the
    /// default database file (see [`crate::paths::default_store_path`]). If
    /// that fails the standard store falls back to memory, so accessors keep
    /// working for the rest of the process.
    pub fn standard() -> Self {
        STANDARD
            .get_or_init(|| Self::open_or_memory(&StoreConfig::default()))
            .clone()
    }

    /// Opens `config`, or an in-memory store if that fails.
    fn open_or_memory(config: &StoreConfig) -> Self {
        Self::from_config(config).unwrap_or_else(|e| {
            warn!(error = %e, "Standard store unavailable, falling back to memory");
            Self::memory()
        })
    }

    /// Installs `store` as the process-wide standard store.
    ///
    /// Must run before the first [`Store::standard`] call (including the
    /// implicit one in [`Accessor::new`]).
    ///
    /// # Errors
    ///
    /// Returns the store back if the standard store is already initialized.
    pub fn install_standard(store: Store) -> std::result::Result<(), Store> {
        STANDARD.set(store)
    }

    /// Builds an accessor bound to `key` on this store.
    pub fn accessor<T>(&self, key: impl Into<String>, default_value: T) -> Accessor<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        Accessor::with_store(key, default_value, self.clone())
    }

    /// Builds an optional accessor bound to `key` on this store.
    pub fn optional<T>(&self, key: impl Into<String>) -> OptionalAccessor<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        OptionalAccessor::with_store(key, self.clone())
    }

    /// Raw bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    pub fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.backend.get(key)
    }

    /// Stores raw bytes under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn set_bytes(&self, key: &str, value: &[u8]) -> Result<()> {
        self.backend.set(key, value.to_vec())
    }

    /// Deletes `key`. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn remove_key(&self, key: &str) -> Result<bool> {
        self.backend.remove(key)
    }

    /// Lists keys, optionally restricted to a prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    pub fn keys(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        self.backend.keys(prefix)
    }

    /// Checks whether `key` holds a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    pub fn contains(&self, key: &str) -> Result<bool> {
        self.backend.contains(key)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clones_share_backend() {
        let store = Store::memory();
        let other = store.clone();

        store.set_bytes("key", b"value").unwrap();
        assert_eq!(other.get_bytes("key").unwrap(), Some(b"value".to_vec()));

        assert!(other.remove_key("key").unwrap());
        assert!(!store.contains("key").unwrap());
    }

    #[test]
    fn test_custom_backend_is_observable() {
        let backend = MemoryBackend::new();
        let store = Store::custom(backend.clone());

        store.set_bytes("userId", b"\"abc\"").unwrap();
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_from_config_memory() {
        let store = Store::from_config(&StoreConfig::memory()).unwrap();
        store.set_bytes("k", b"1").unwrap();
        assert_eq!(store.keys(None).unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.redb");

        {
            let store = Store::from_config(&StoreConfig::file(&path)).unwrap();
            store.accessor("launches", 0u32).set(3);
        }

        let store = Store::file(&path).unwrap();
        assert_eq!(store.accessor("launches", 0u32).get(), 3);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        assert!(Store::from_config(&StoreConfig::file("")).is_err());
    }

    #[test]
    fn test_unopenable_file_falls_back_to_memory() {
        // A regular file cannot be the parent directory of the database
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let path = blocker.path().join("defaults.redb");
        let config = StoreConfig::file(&path);
        assert!(Store::from_config(&config).is_err());

        let store = Store::open_or_memory(&config);
        let launches = store.accessor("launches", 0u32);
        launches.set(5);
        assert_eq!(launches.get(), 5);
        assert_eq!(store.keys(None).unwrap(), vec!["launches".to_string()]);
        assert!(!path.exists());
    }

    #[test]
    fn test_debug_does_not_expose_backend() {
        assert_eq!(format!("{:?}", Store::memory()), "Store { .. }");
    }
}
