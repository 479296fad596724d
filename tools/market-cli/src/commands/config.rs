//! Configuration commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

const CONFIG_FILE: &str = "market.toml";

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Init { force } => init(ctx, force),
    }
}

fn show(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Configuration");
    ctx.output
        .kv("store", &ctx.store_dir().display().to_string());
    ctx.output.kv("storage key", &ctx.config.cart.storage_key);
    ctx.output.kv("log filter", &ctx.config.log.filter);
    Ok(())
}

fn init(ctx: &Context, force: bool) -> Result<()> {
    let path = ctx.resolve_path(CONFIG_FILE);
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    std::fs::write(&path, generate_default_config())?;
    ctx.output
        .success(&format!("Wrote {}", path.display()));
    Ok(())
}
