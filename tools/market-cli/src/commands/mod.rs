//! CLI command implementations.

pub mod add;
pub mod config;
pub mod quantity;
pub mod show;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub id: String,

    /// Display name.
    #[arg(short, long)]
    pub title: String,

    /// Image reference.
    #[arg(short, long, default_value = "")]
    pub image_url: String,

    /// Unit price.
    #[arg(short, long, default_value = "0")]
    pub price: f64,
}

/// Arguments for the increment and decrement commands.
#[derive(Args)]
pub struct QuantityArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
