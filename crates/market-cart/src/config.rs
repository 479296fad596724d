//! Cart store configuration.

use market_cache::cache_key;
use serde::{Deserialize, Serialize};

/// Namespace of every key the cart writes.
pub const KEY_NAMESPACE: &str = "@GoMarketplace";

/// Configuration for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key the cart snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_key() -> String {
    cache_key!(KEY_NAMESPACE, "products")
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

impl CartConfig {
    /// Use a different snapshot key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key() {
        assert_eq!(CartConfig::default().storage_key, "@GoMarketplace:products");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: CartConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CartConfig::default());
    }
}
