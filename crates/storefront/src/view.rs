//! Presentation projections.
//!
//! These are pure functions of shop state: given the same cart and catalog
//! they always produce the same view. Every cart mutation re-runs
//! [`CartView::project`] so the sidebar, total and badge stay in sync.

use pocket_shop_core::{Price, Product, ProductId};
use serde::Serialize;

use crate::cart::Cart;
use crate::catalog::Catalog;

/// Message shown in place of cart lines when the cart is empty.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_price: String,
    pub image: String,
}

/// Cart display data: lines (or the empty placeholder), total and badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub is_empty: bool,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// The placeholder view of an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            is_empty: true,
            total: Price::zero().display(),
            item_count: 0,
        }
    }

    /// Project `cart` into display data, joining each line against `catalog`.
    #[must_use]
    pub fn project(cart: &Cart, catalog: &Catalog) -> Self {
        if cart.is_empty() {
            return Self::empty();
        }

        let items = cart
            .lines()
            .iter()
            .filter_map(|line| {
                let product = catalog.get(line.product_id)?;
                Some(CartItemView {
                    product_id: product.id,
                    name: product.name.clone(),
                    price: product.price.display(),
                    quantity: line.quantity,
                    line_price: product.price.times(line.quantity).display(),
                    image: product.image.clone(),
                })
            })
            .collect();

        Self {
            items,
            is_empty: false,
            total: cart.total(catalog).display(),
            item_count: cart.item_count(),
        }
    }

    /// Placeholder text when there is nothing to list.
    #[must_use]
    pub const fn empty_message(&self) -> &'static str {
        EMPTY_CART_MESSAGE
    }
}

/// Product grid card display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.display(),
            image: product.image.clone(),
        }
    }
}

/// Project a list of products into grid cards.
#[must_use]
pub fn product_cards<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<ProductCardView> {
    products.into_iter().map(ProductCardView::from).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::CartStore;
    use crate::storage::MemoryStore;

    fn store() -> CartStore {
        CartStore::load(Arc::new(Catalog::reference()), Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_empty_cart_projects_placeholder() {
        let store = store();
        let view = CartView::project(store.cart(), store.catalog());
        assert_eq!(view, CartView::empty());
        assert!(view.is_empty);
        assert_eq!(view.total, "$0.00");
        assert_eq!(view.item_count, 0);
        assert_eq!(view.empty_message(), "Your cart is empty.");
    }

    #[test]
    fn test_projection_lines_total_and_badge() {
        let mut store = store();
        store.add_item(ProductId::new(4)).unwrap();
        store.add_item(ProductId::new(1)).unwrap();
        store.add_item(ProductId::new(4)).unwrap();

        let view = CartView::project(store.cart(), store.catalog());
        assert!(!view.is_empty);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "$667.00");

        let keyboard = &view.items[0];
        assert_eq!(keyboard.name, "Mechanical Keyboard");
        assert_eq!(keyboard.price, "$159.00");
        assert_eq!(keyboard.quantity, 2);
        assert_eq!(keyboard.line_price, "$318.00");
        assert_eq!(view.items[1].name, "Sony WH-1000XM5");
    }

    #[test]
    fn test_projection_is_deterministic() {
        let mut store = store();
        store.add_item(ProductId::new(2)).unwrap();
        let first = CartView::project(store.cart(), store.catalog());
        let second = CartView::project(store.cart(), store.catalog());
        assert_eq!(first, second);
    }

    #[test]
    fn test_oversized_prices_project_without_overflow() {
        let catalog = Catalog::new(vec![
            Product::new(1, "Yacht", Decimal::MAX, "Marine", ""),
            Product::new(2, "Anchor", Decimal::MAX, "Marine", ""),
        ])
        .unwrap();
        let mut store = CartStore::load(Arc::new(catalog), Arc::new(MemoryStore::new()));
        for _ in 0..3 {
            store.add_item(ProductId::new(1)).unwrap();
        }
        store.add_item(ProductId::new(2)).unwrap();

        let view = CartView::project(store.cart(), store.catalog());
        assert_eq!(view.item_count, 4);
        assert_eq!(store.total().amount, Decimal::MAX);
        assert_eq!(view.total, view.items[0].line_price);
    }

    #[test]
    fn test_product_cards() {
        let catalog = Catalog::reference();
        let cards = product_cards(catalog.search("ray"));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].price, "$199.00");
        assert_eq!(cards[0].category, "Fashion");
    }
}
