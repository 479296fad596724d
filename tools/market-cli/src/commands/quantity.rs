//! Increment and decrement commands.

use anyhow::{Context as _, Result};
use market_cart::{Adjustment, ProductId};

use super::QuantityArgs;
use crate::context::Context;

/// Direction of a one-unit change.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Up,
    Down,
}

/// Run the increment or decrement command.
pub async fn run(args: QuantityArgs, step: Step, ctx: &Context) -> Result<()> {
    let provider = ctx.open_cart().await;
    let cart = provider.cart()?;
    let id = ProductId::new(args.id);

    let adjustment = match step {
        Step::Up => cart.increment(&id).await,
        Step::Down => cart.decrement(&id).await,
    };

    match adjustment {
        Some(Adjustment::Updated { quantity }) => {
            ctx.output.success(&format!("{} now x{}", id, quantity))
        }
        Some(Adjustment::Removed) => ctx.output.success(&format!("Removed {}", id)),
        Some(Adjustment::Added) => {}
        None => ctx.output.warn(&format!("{} is not in the cart", id)),
    }

    cart.flush().await.context("Failed to save cart")?;
    ctx.output.cart(&cart.items());
    Ok(())
}
