//! Shopping cart state with quantity reconciliation and durable snapshots.
//!
//! - **Cart**: ordered line items, one per product, each holding at least one unit
//! - **CartStore**: owns the session's cart, gates mutations on the initial
//!   load and writes a snapshot after every change, in order
//! - **CartProvider**: explicit scope presentation code gets the store from
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use market_cache::FileStore;
//! use market_cart::prelude::*;
//!
//! let store = CartStore::open(Arc::new(FileStore::new(".cart")), CartConfig::default()).await;
//! let provider = CartProvider::with_store(store);
//!
//! let cart = provider.cart()?;
//! cart.add_to_cart(NewLineItem::new("sku-1", "Mug", "https://img/mug.png", 12.0)).await;
//! cart.increment(&ProductId::new("sku-1")).await;
//! cart.flush().await?;
//! ```

pub mod cart;
pub mod config;
pub mod error;
pub mod ids;
pub mod item;
pub mod provider;
pub mod store;

pub use cart::{Adjustment, Cart};
pub use config::CartConfig;
pub use error::CartError;
pub use ids::ProductId;
pub use item::{LineItem, NewLineItem};
pub use provider::CartProvider;
pub use store::{CartStore, PersistStats};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{Adjustment, Cart};
    pub use crate::config::CartConfig;
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::item::{LineItem, NewLineItem};
    pub use crate::provider::CartProvider;
    pub use crate::store::{CartStore, PersistStats};
}
