//! Key-value byte stores and a typed JSON cache for the marketplace cart.
//!
//! The [`KvStore`] trait is the byte-level contract the cart persists
//! through. Two backends ship with the crate:
//!
//! - [`MemoryStore`] - HashMap-based, for tests and embedding
//! - [`FileStore`] - one file per key under a root directory
//!
//! [`Cache`] layers JSON serialization on top of any backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use market_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(Arc::new(MemoryStore::new()));
//!
//! // Store a value
//! cache.set("@GoMarketplace:products", &items).await?;
//!
//! // Retrieve a value
//! let items: Option<Vec<LineItem>> = cache.get("@GoMarketplace:products").await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;
mod store;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::Cache;
pub use memory::MemoryStore;
pub use store::KvStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
