//! Shopping cart state.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, one per product, in the
//! order products were first added. Totals are never stored; they are
//! recomputed from the catalog on demand so a price change in the catalog
//! can never leave a stale price in the cart.
//!
//! [`CartStore`] is the only mutator of the cart and mirrors every change to
//! durable storage.

mod store;

pub use store::CartStore;

use pocket_shop_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;

/// Errors raised by cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    /// The referenced product is not in the catalog.
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    /// The cart is frozen while a payment runs.
    #[error("cart is locked while a payment is processing")]
    Locked,
}

/// One product in the cart.
///
/// Invariant: `quantity >= 1`. A line that would drop to zero is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product reference into the catalog.
    pub product_id: ProductId,
    /// Number of units, always at least one.
    pub quantity: u32,
}

/// Ordered cart lines, at most one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Quantity of `product_id` in the cart, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.line(product_id).map(|line| line.quantity)
    }

    /// Sum of quantity times unit price over all lines.
    ///
    /// Lines whose product is missing from `catalog` contribute nothing.
    #[must_use]
    pub fn total(&self, catalog: &Catalog) -> Price {
        self.lines
            .iter()
            .filter_map(|line| {
                catalog
                    .get(line.product_id)
                    .map(|product| product.price.times(line.quantity))
            })
            .sum()
    }

    /// Sum of quantities over all lines (the badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }

    /// Add one unit, appending a new line on first sight.
    fn increment(&mut self, product_id: ProductId) {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product_id,
                quantity: 1,
            });
        }
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    /// Apply `delta` to a line, removing it when it reaches zero.
    /// Returns whether the cart changed.
    fn adjust(&mut self, product_id: ProductId, delta: i32) -> bool {
        if delta == 0 {
            return false;
        }
        let Some(line) = self.line_mut(product_id) else {
            return false;
        };
        let next = i64::from(line.quantity) + i64::from(delta);
        if next <= 0 {
            return self.remove(product_id);
        }
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        true
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    #[test]
    fn test_increment_preserves_first_seen_order() {
        let mut cart = Cart::new();
        cart.increment(id(3));
        cart.increment(id(1));
        cart.increment(id(3));

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(cart.quantity_of(id(3)), Some(2));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_adjust_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.increment(id(1));
        assert!(cart.adjust(id(1), -1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_below_zero_removes_line() {
        let mut cart = Cart::new();
        cart.increment(id(1));
        assert!(cart.adjust(id(1), -5));
        assert_eq!(cart.quantity_of(id(1)), None);
    }

    #[test]
    fn test_adjust_missing_or_zero_delta_is_noop() {
        let mut cart = Cart::new();
        cart.increment(id(1));
        assert!(!cart.adjust(id(2), 1));
        assert!(!cart.adjust(id(1), 0));
        assert_eq!(cart.quantity_of(id(1)), Some(1));
    }

    #[test]
    fn test_total_uses_catalog_prices() {
        let catalog = Catalog::reference();
        let mut cart = Cart::new();
        cart.increment(id(1));
        cart.increment(id(6));
        cart.increment(id(6));
        assert_eq!(cart.total(&catalog).display(), "$487.00");
    }

    #[test]
    fn test_cart_line_serde_shape() {
        let line: CartLine = serde_json::from_str(r#"{"product_id": 2, "quantity": 4}"#).unwrap();
        assert_eq!(line.product_id, id(2));
        assert_eq!(line.quantity, 4);
    }
}
