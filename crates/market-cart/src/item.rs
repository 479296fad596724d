//! Line item types.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// One distinct product held in the cart, with the number of units held.
///
/// `quantity` is at least 1 for every item inside a [`Cart`](crate::Cart).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Image reference.
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: String,
    /// Unit price. Carried through untouched.
    pub price: f64,
    /// Units held.
    pub quantity: u32,
}

/// A product offered to the cart, before it has a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewLineItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Image reference.
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl NewLineItem {
    /// Create a new candidate item.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Turn the candidate into a line item holding `quantity` units.
    pub fn with_quantity(self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}
