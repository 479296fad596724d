//! Market CLI - inspect and edit the local marketplace cart.
//!
//! Commands:
//! - `market show` - Print the cart
//! - `market add` - Add one unit of a product
//! - `market increment` - Add one unit of a product already in the cart
//! - `market decrement` - Remove one unit, dropping the product at zero
//! - `market config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::quantity::Step;
use commands::{AddArgs, ConfigArgs, QuantityArgs};

/// Market CLI - inspect and edit the local marketplace cart
#[derive(Parser)]
#[command(name = "market")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,

    /// Add one unit of a product
    Add(AddArgs),

    /// Add one unit of a product already in the cart
    Increment(QuantityArgs),

    /// Remove one unit of a product
    Decrement(QuantityArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    init_tracing(&ctx.config.log.filter, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Show => commands::show::run(&ctx).await,
        Commands::Add(args) => commands::add::run(args, &ctx).await,
        Commands::Increment(args) => commands::quantity::run(args, Step::Up, &ctx).await,
        Commands::Decrement(args) => commands::quantity::run(args, Step::Down, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Send `tracing` events to stderr. `RUST_LOG` wins over the configured filter.
fn init_tracing(filter: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
