//! Typed, defaulted properties over a flat key-value store.
//!
//! Declare a property as a key, a default value and a serde-encodable type;
//! read it back as that type without ever handling bytes or errors:
//!
//! ```ignore
//! use kvprop::{Accessor, OptionalAccessor};
//!
//! let age = Accessor::new("age", 0u32);
//! let last_name = OptionalAccessor::<String>::new("lastName");
//!
//! age.set(42);
//! assert_eq!(age.get(), 42);
//! assert_eq!(last_name.get(), None);
//! ```
//!
//! Values are stored as JSON in a [`Store`]. [`Store::standard`] is the
//! process-wide store (a redb file under the platform data directory); tests
//! and embedders swap it for [`Store::memory`] via [`Store::install_standard`]
//! or bind accessors to a store explicitly with [`Accessor::with_store`].
//!
//! Reads fall back to the default when the key is absent or its value no
//! longer decodes; writes that fail to encode are dropped. The `try_*`
//! methods expose those failures as [`Error`] instead.

pub mod accessor;
pub mod backend;
mod codec;
pub mod config;
pub mod error;
pub mod optional;
pub mod paths;
pub mod store;


pub use accessor::Accessor;
pub use backend::{KvBackend, MemoryBackend, RedbBackend};
pub use config::{BackendKind, StoreConfig};
pub use error::{Error, Result};
pub use optional::OptionalAccessor;
pub use store::Store;
