//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using a store or the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific store failure.
    #[error("Store operation failed: {0}")]
    Store(String),

    /// Key cannot be used by this backend.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

impl CacheError {
    /// Whether the error came from decoding stored bytes.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}
