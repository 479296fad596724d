//! Show the cart.

use anyhow::Result;

use crate::context::Context;

/// Run the show command.
pub async fn run(ctx: &Context) -> Result<()> {
    let provider = ctx.open_cart().await;
    let cart = provider.cart()?;

    ctx.output.cart(&cart.items());
    Ok(())
}
