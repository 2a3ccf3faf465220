//! Accessor for optional properties that need no explicit default.
//!
//! `set(None)` stores an encoded `null` rather than deleting the key, so an
//! explicitly cleared property is still visible in the store. Use
//! [`OptionalAccessor::clear`] to remove the key instead. Both read back as
//! `None`.

use crate::accessor::Accessor;
use crate::error::Result;
use crate::store::Store;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Typed property whose default is `None`.
#[derive(Debug, Clone)]
pub struct OptionalAccessor<T> {
    inner: Accessor<Option<T>>,
}

impl<T> OptionalAccessor<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Binds `key` on the standard store.
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_store(key, Store::standard())
    }

    /// Binds `key` on an explicit store.
    pub fn with_store(key: impl Into<String>, store: Store) -> Self {
        Self {
            inner: Accessor::with_store(key, None, store),
        }
    }

    /// The bound key.
    pub fn key(&self) -> &str {
        self.inner.key()
    }

    /// The underlying `Option<T>` accessor.
    pub fn as_accessor(&self) -> &Accessor<Option<T>> {
        &self.inner
    }

    /// Current value; `None` if absent, cleared or undecodable.
    pub fn get(&self) -> Option<T> {
        self.inner.get()
    }

    /// Stores `value`; `None` is stored as an encoded `null`.
    pub fn set(&self, value: Option<T>) {
        self.inner.set(value);
    }

    /// Strict read. Absent keys and stored `null` both give `Ok(None)`.
    ///
    /// # Errors
    ///
    /// See [`Accessor::try_get`].
    pub fn try_get(&self) -> Result<Option<T>> {
        Ok(self.inner.try_get()?.flatten())
    }

    /// Strict write.
    ///
    /// # Errors
    ///
    /// See [`Accessor::try_set`].
    pub fn try_set(&self, value: Option<T>) -> Result<()> {
        self.inner.try_set(value)
    }

    /// Whether the key holds anything, including an encoded `null`.
    pub fn is_stored(&self) -> bool {
        self.inner.is_stored()
    }

    /// Deletes the key.
    pub fn clear(&self) {
        self.inner.reset();
    }
}

impl<T> From<OptionalAccessor<T>> for Accessor<Option<T>> {
    fn from(optional: OptionalAccessor<T>) -> Self {
        optional.inner
    }
}
