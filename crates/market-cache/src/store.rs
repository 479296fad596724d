//! The key-value byte-store contract.

use async_trait::async_trait;

use crate::CacheError;

/// A durable key-value byte store.
///
/// Implementations must apply writes issued from a single task in the order
/// they were issued. The cart relies on this to never let an older snapshot
/// overwrite a newer one.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the bytes stored under `key`.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous content.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check whether `key` holds a value.
    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key).await?.is_some())
    }
}
