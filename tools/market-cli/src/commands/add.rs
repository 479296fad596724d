//! Add a product to the cart.

use anyhow::{Context as _, Result};
use market_cart::{Adjustment, NewLineItem};

use super::AddArgs;
use crate::context::Context;

/// Run the add command.
pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let provider = ctx.open_cart().await;
    let cart = provider.cart()?;

    let candidate = NewLineItem::new(args.id.as_str(), args.title, args.image_url, args.price);
    match cart.add_to_cart(candidate).await {
        Adjustment::Added => ctx.output.success(&format!("Added {}", args.id)),
        Adjustment::Updated { quantity } => ctx
            .output
            .success(&format!("{} now x{}", args.id, quantity)),
        Adjustment::Removed => {}
    }

    cart.flush().await.context("Failed to save cart")?;
    ctx.output.cart(&cart.items());
    Ok(())
}
