//! Cart error types.

use thiserror::Error;

/// Errors surfaced by the cart.
///
/// Corrupt snapshots and lookup misses are not errors; they are logged and
/// treated as an empty snapshot or a no-op.
#[derive(Error, Debug)]
pub enum CartError {
    /// The cart was requested from a provider with no store installed.
    #[error("use_cart must be used within a CartProvider")]
    OutsideProvider,

    /// A snapshot write failed since the last flush.
    #[error("Failed to persist cart snapshot: {0}")]
    Persist(String),

    /// The persistence task has stopped.
    #[error("Cart writer task has stopped")]
    WriterClosed,
}
