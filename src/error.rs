//! Error types for the strict accessor API.
//!
//! The ergonomic `get`/`set` methods never return these: they log and fall
//! back to the default value or drop the write. `try_get`/`try_set` surface
//! them so callers can tell corruption apart from absence.

/// Result type for strict accessor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Accessor errors with the key they occurred on.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Value could not be serialized.
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored bytes could not be deserialized into the accessor's type.
    #[error("failed to decode value for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend failed to read or write.
    #[error("backend error for key '{key}': {source}")]
    Backend {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    /// Create an encode error.
    pub fn encode(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            key: key.into(),
            source,
        }
    }

    /// Create a decode error.
    pub fn decode(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            key: key.into(),
            source,
        }
    }

    /// Create a backend error.
    pub fn backend(key: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Backend {
            key: key.into(),
            source,
        }
    }

    /// The key the failing operation was bound to.
    pub fn key(&self) -> &str {
        match self {
            Self::Encode { key, .. } | Self::Decode { key, .. } | Self::Backend { key, .. } => key,
        }
    }
}
