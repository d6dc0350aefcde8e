//! In-memory shopping cart.
//!
//! The cart is a keyed quantity mapping: at most one entry per resolved
//! product identity (see [`Product::key`]), with adds merging into the
//! existing entry. The collection serializes to JSON so the storefront can
//! persist it into the browser session on every mutation and rehydrate it
//! on the next request.

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// A product together with the quantity in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// The shopping cart collection.
///
/// Invariant: entries are unique by resolved product identity, and every
/// entry has quantity >= 1. Mutations that would leave a zero-quantity
/// entry remove it instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product, merging the quantity into an existing entry with the
    /// same resolved identity or appending a new one.
    ///
    /// A quantity of 0 leaves the cart unchanged.
    pub fn add(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.key() == product.key())
        {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem { product, quantity });
        }
    }

    /// Remove the entry matching the resolved identity, if present.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.product.key() != id);
    }

    /// Replace the quantity of the matching entry.
    ///
    /// A quantity of 0 behaves as [`remove`](Self::remove). Setting the
    /// quantity of an id not in the cart is a no-op.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.product.key() == id) {
            item.quantity = quantity;
        }
    }

    /// Empty the collection.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price x quantity over all entries. Floating point; any
    /// currency rounding happens at display time.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all entries.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
