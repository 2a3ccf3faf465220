//! Typed, defaulted accessor over a single store key.
//!
//! An [`Accessor<T>`] binds a key, a default value and a [`Store`]. Reading
//! decodes whatever is stored under the key and falls back to the default when
//! nothing usable is there; writing encodes the value and overwrites the key.
//!
//! The plain [`get`](Accessor::get)/[`set`](Accessor::set) pair never fails:
//! decode, encode and backend errors are logged and swallowed. Callers that
//! need to see them use [`try_get`](Accessor::try_get)/[`try_set`](Accessor::try_set).
//!
//! # Example
//!
//! ```ignore
//! use kvprop::{Accessor, Store};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct City {
//!     name: String,
//! }
//!
//! struct Settings {
//!     age: Accessor<u32>,
//!     city: Accessor<City>,
//! }
//!
//! impl Settings {
//!     fn new(store: &Store) -> Self {
//!         Self {
//!             age: store.accessor("age", 0),
//!             city: store.accessor("city", City { name: "Tokyo".into() }),
//!         }
//!     }
//! }
//! ```

use crate::codec;
use crate::error::{Error, Result};
use crate::store::Store;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Typed property stored under one key.
///
/// Holds no state besides its binding: every `get` re-reads and re-decodes
/// from the store, and every `set` goes straight to it.
#[derive(Debug, Clone)]
pub struct Accessor<T> {
    key: String,
    default_value: T,
    store: Store,
}

impl<T> Accessor<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Binds `key` on the standard store.
    pub fn new(key: impl Into<String>, default_value: T) -> Self {
        Self::with_store(key, default_value, Store::standard())
    }

    /// Binds `key` on an explicit store.
    pub fn with_store(key: impl Into<String>, default_value: T, store: Store) -> Self {
        Self {
            key: key.into(),
            default_value,
            store,
        }
    }

    /// The bound key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value returned when nothing usable is stored.
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// The store this accessor reads and writes.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Current value, or the default if the key is absent or undecodable.
    pub fn get(&self) -> T {
        match self.try_get() {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(key = %self.key, "No stored value, using default");
                self.default_value.clone()
            },
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable value, using default");
                self.default_value.clone()
            },
        }
    }

    /// Stores `value`. Encoding or backend failures leave the previous value
    /// in place.
    pub fn set(&self, value: T) {
        if let Err(e) = self.try_set(value) {
            warn!(key = %self.key, error = %e, "Dropping write");
        }
    }

    /// Strict read: `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] if the store cannot be read and
    /// [`Error::Decode`] if the stored bytes don't decode into `T`.
    pub fn try_get(&self) -> Result<Option<T>> {
        let Some(bytes) = self
            .store
            .get_bytes(&self.key)
            .map_err(|e| Error::backend(&self.key, e))?
        else {
            return Ok(None);
        };

        codec::decode(&self.key, &bytes).map(Some)
    }

    /// Strict write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if `value` cannot be serialized (nothing is
    /// written) and [`Error::Backend`] if the store rejects the write.
    pub fn try_set(&self, value: T) -> Result<()> {
        let bytes = codec::encode(&self.key, &value)?;
        self.store
            .set_bytes(&self.key, &bytes)
            .map_err(|e| Error::backend(&self.key, e))
    }

    /// Whether the key currently holds a value (decodable or not).
    pub fn is_stored(&self) -> bool {
        self.store.contains(&self.key).unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "Failed to check key");
            false
        })
    }

    /// Deletes the stored value so reads fall back to the default.
    pub fn reset(&self) {
        if let Err(e) = self.store.remove_key(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to reset key");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{KvBackend, MemoryBackend};
    use serde::{Deserialize, Serializer};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct City {
        name: String,
    }

    fn tokyo() -> City {
        City {
            name: "Tokyo".into(),
        }
    }

    /// Serializes normally unless `fail` is set.
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Flaky {
        fail: bool,
        label: String,
    }

    impl Serialize for Flaky {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            use serde::ser::{Error as _, SerializeStruct};

            if self.fail {
                return Err(S::Error::custom("refusing to serialize"));
            }
            let mut state = serializer.serialize_struct("Flaky", 2)?;
            state.serialize_field("fail", &self.fail)?;
            state.serialize_field("label", &self.label)?;
            state.end()
        }
    }

    /// Backend whose every operation fails.
    struct BrokenBackend;

    impl KvBackend for BrokenBackend {
        fn get(&self, _key: &str) -> anyhow::Result<Option<Vec<u8>>> {
            anyhow::bail!("read failed")
        }

        fn set(&self, _key: &str, _value: Vec<u8>) -> anyhow::Result<()> {
            anyhow::bail!("write failed")
        }

        fn remove(&self, _key: &str) -> anyhow::Result<bool> {
            anyhow::bail!("remove failed")
        }

        fn keys(&self, _prefix: Option<&str>) -> anyhow::Result<Vec<String>> {
            anyhow::bail!("list failed")
        }
    }

    #[test]
    fn test_unset_key_returns_default() {
        let city = Accessor::with_store("city", tokyo(), Store::memory());
        assert_eq!(city.get(), tokyo());
    }

    #[test]
    fn test_get_does_not_store_default() {
        let backend = MemoryBackend::new();
        let city = Accessor::with_store("city", tokyo(), Store::custom(backend.clone()));

        let _ = city.get();
        assert!(backend.is_empty());
        assert!(!city.is_stored());
    }

    #[test]
    fn test_set_then_get() {
        let city = Accessor::with_store("city", tokyo(), Store::memory());

        city.set(City {
            name: "Osaka".into(),
        });
        assert_eq!(city.get().name, "Osaka");
        assert!(city.is_stored());
    }

    #[test]
    fn test_stored_default_is_distinct_from_absent() {
        let count = Accessor::with_store("count", 0i64, Store::memory());

        count.set(0);
        assert!(count.is_stored());
        assert_eq!(count.try_get().unwrap(), Some(0));
    }

    #[test]
    fn test_decode_failure_returns_default() {
        let store = Store::memory();
        store.set_bytes("city", b"{not json").unwrap();

        let city = store.accessor("city", tokyo());
        assert_eq!(city.get(), tokyo());
        assert!(matches!(city.try_get(), Err(Error::Decode { .. })));
    }

    #[test]
    fn test_type_mismatch_returns_default() {
        let store = Store::memory();
        store.accessor("value", String::new()).set("text".to_string());

        let number = store.accessor("value", 7u8);
        assert_eq!(number.get(), 7);
    }

    #[test]
    fn test_encode_failure_keeps_previous_value() {
        let flaky = Accessor::with_store(
            "flaky",
            Flaky {
                fail: false,
                label: "default".into(),
            },
            Store::memory(),
        );

        let stored = Flaky {
            fail: false,
            label: "stored".into(),
        };
        flaky.set(stored.clone());

        flaky.set(Flaky {
            fail: true,
            label: "lost".into(),
        });
        assert_eq!(flaky.get(), stored);
    }

    #[test]
    fn test_non_finite_float_keeps_previous_value() {
        let backend = MemoryBackend::new();
        let ratio = Accessor::with_store("ratio", 1.0f64, Store::custom(backend.clone()));

        ratio.set(2.5);
        ratio.set(f64::INFINITY);
        assert_eq!(ratio.get(), 2.5);
        assert_eq!(backend.get("ratio").unwrap(), Some(b"2.5".to_vec()));

        assert!(matches!(ratio.try_set(f64::NAN), Err(Error::Encode { .. })));
        assert!(matches!(
            ratio.try_set(f64::NEG_INFINITY),
            Err(Error::Encode { .. })
        ));
        assert_eq!(ratio.get(), 2.5);
    }

    #[test]
    fn test_try_set_reports_encode_failure() {
        let flaky = Accessor::with_store(
            "flaky",
            Flaky {
                fail: false,
                label: String::new(),
            },
            Store::memory(),
        );

        let err = flaky
            .try_set(Flaky {
                fail: true,
                label: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
        assert!(!flaky.is_stored());
    }

    #[test]
    fn test_broken_backend_degrades() {
        let user_id = Accessor::with_store("userId", "guest".to_string(), Store::custom(BrokenBackend));

        user_id.set("someone".to_string());
        assert_eq!(user_id.get(), "guest");
        assert!(!user_id.is_stored());
        user_id.reset();

        assert!(matches!(user_id.try_get(), Err(Error::Backend { .. })));
        assert!(matches!(
            user_id.try_set("someone".to_string()),
            Err(Error::Backend { .. })
        ));
    }

    #[test]
    fn test_reset_restores_default() {
        let age = Accessor::with_store("age", 0u32, Store::memory());

        age.set(30);
        age.reset();
        assert_eq!(age.get(), 0);
        assert!(!age.is_stored());
    }

    #[test]
    fn test_accessors_on_same_key_share_value() {
        let store = Store::memory();
        let first = store.accessor("shared", 1u16);
        let second = store.accessor("shared", 2u16);

        first.set(10);
        assert_eq!(second.get(), 10);
    }

    #[test]
    fn test_binding_getters() {
        let city = Accessor::with_store("city", tokyo(), Store::memory());
        assert_eq!(city.key(), "city");
        assert_eq!(city.default_value(), &tokyo());
        assert!(!city.store().contains("city").unwrap());
    }

    #[test]
    fn test_shared_across_threads() {
        let counter = Accessor::with_store("counter", 0u64, Store::memory());

        let handles: Vec<_> = (1..=4u64)
            .map(|n| {
                let counter = counter.clone();
                std::thread::spawn(move || counter.set(n))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Last write wins; any of the written values is acceptable
        assert!((1..=4).contains(&counter.get()));
    }
}
