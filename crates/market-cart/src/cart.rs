//! Cart contents and quantity reconciliation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ids::ProductId;
use crate::item::{LineItem, NewLineItem};

/// Outcome of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// A new line item was appended with quantity 1.
    Added,
    /// An existing line item now holds `quantity` units.
    Updated { quantity: u32 },
    /// The line item dropped to zero and was removed.
    Removed,
}

/// Ordered line items, keyed implicitly by product ID.
///
/// New items append at the end; quantity updates keep their position.
/// No two items share an ID and every quantity is at least 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from a persisted snapshot.
    ///
    /// Entries at quantity 0 are dropped and a repeated ID keeps its first
    /// occurrence.
    pub fn from_snapshot(snapshot: Vec<LineItem>) -> Self {
        let mut seen = HashSet::with_capacity(snapshot.len());
        let mut items = Vec::with_capacity(snapshot.len());

        for item in snapshot {
            if item.quantity == 0 {
                warn!(id = %item.id, "Dropping snapshot entry with zero quantity");
                continue;
            }
            if !seen.insert(item.id.clone()) {
                warn!(id = %item.id, "Dropping duplicate snapshot entry");
                continue;
            }
            items.push(item);
        }

        Self { items }
    }

    /// Line items in cart order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart and return its line items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Iterate over line items in cart order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Position of the line item with this ID.
    pub fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.id == id)
    }

    /// Get a line item by ID.
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Add one unit of `candidate`.
    ///
    /// A product already in the cart is incremented in place; otherwise it is
    /// appended with quantity 1.
    pub fn add(&mut self, candidate: NewLineItem) -> Adjustment {
        if let Some(position) = self.position(&candidate.id) {
            if let Some(adjustment) = self.change_quantity(position, 1) {
                return adjustment;
            }
        }

        self.items.push(candidate.with_quantity(1));
        Adjustment::Added
    }

    /// Add one unit of the product with this ID.
    ///
    /// Returns `None` and leaves the cart untouched when the ID isn't present.
    pub fn increment(&mut self, id: &ProductId) -> Option<Adjustment> {
        let position = self.position(id)?;
        self.change_quantity(position, 1)
    }

    /// Remove one unit of the product with this ID.
    ///
    /// Returns `None` and leaves the cart untouched when the ID isn't present.
    pub fn decrement(&mut self, id: &ProductId) -> Option<Adjustment> {
        let position = self.position(id)?;
        self.change_quantity(position, -1)
    }

    /// Shift the quantity of the item at `position` by `delta`.
    ///
    /// A result of zero or less removes the item; later items shift left.
    /// Quantities saturate at `u32::MAX`. Returns `None` when `position` is
    /// out of range.
    pub fn change_quantity(&mut self, position: usize, delta: i64) -> Option<Adjustment> {
        let item = self.items.get_mut(position)?;
        let next = i64::from(item.quantity).saturating_add(delta);

        if next > 0 {
            let quantity = u32::try_from(next).unwrap_or(u32::MAX);
            item.quantity = quantity;
            Some(Adjustment::Updated { quantity })
        } else {
            self.items.remove(position);
            Some(Adjustment::Removed)
        }
    }

    /// Take over a freshly loaded snapshot.
    ///
    /// An empty snapshot never replaces the current contents. Returns whether
    /// the cart was replaced.
    pub fn absorb_loaded(&mut self, loaded: Cart) -> bool {
        if loaded.is_empty() {
            return false;
        }
        *self = loaded;
        true
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
