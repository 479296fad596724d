//! CLI configuration.

use anyhow::{Context, Result};
use market_cart::CartConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where snapshots are kept on disk.
    #[serde(default)]
    pub store: StoreConfig,

    /// Cart store settings.
    #[serde(default)]
    pub cart: CartConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Snapshot storage location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one file per key, relative to the working directory.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    ".market".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Generate a default market.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Marketplace cart configuration

[store]
# Directory holding the cart snapshot
path = "{path}"

[cart]
storage_key = "{key}"

[log]
# Overridden by RUST_LOG; --verbose forces "debug"
filter = "{filter}"
"#,
        path = default_store_path(),
        key = CartConfig::default().storage_key,
        filter = default_log_filter(),
    )
}
