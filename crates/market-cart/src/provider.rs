//! Explicit scope handing a cart store to presentation code.

use crate::error::CartError;
use crate::store::CartStore;

/// Owned slot for the session's [`CartStore`].
///
/// Presentation code asks the provider for the cart instead of reaching for
/// global state. Asking before a store has been installed is a wiring bug and
/// fails with [`CartError::OutsideProvider`].
#[derive(Debug, Default)]
pub struct CartProvider {
    store: Option<CartStore>,
}

impl CartProvider {
    /// Create a provider with no store installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider around an existing store.
    pub fn with_store(store: CartStore) -> Self {
        Self { store: Some(store) }
    }

    /// Install a store, returning the one it replaces.
    pub fn install(&mut self, store: CartStore) -> Option<CartStore> {
        self.store.replace(store)
    }

    /// Remove the installed store, closing the scope.
    pub fn take(&mut self) -> Option<CartStore> {
        self.store.take()
    }

    /// The installed cart store.
    pub fn cart(&self) -> Result<&CartStore, CartError> {
        self.store.as_ref().ok_or(CartError::OutsideProvider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CartConfig;
    use market_cache::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_empty_provider_fails_fast() {
        let provider = CartProvider::new();
        let err = provider.cart().unwrap_err();

        assert!(matches!(err, CartError::OutsideProvider));
        assert_eq!(err.to_string(), "use_cart must be used within a CartProvider");
    }

    #[tokio::test]
    async fn test_install_and_take() {
        let store = CartStore::open(Arc::new(MemoryStore::new()), CartConfig::default()).await;
        let mut provider = CartProvider::new();

        assert!(provider.install(store).is_none());
        assert!(provider.cart().is_ok());

        assert!(provider.take().is_some());
        assert!(provider.cart().is_err());
    }
}
