//! Catalog product record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A purchasable product.
///
/// Products are defined by the catalog at startup and never mutated
/// afterwards. Cart lines only ever reference them by [`ProductId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Non-negative unit price.
    pub price: Price,
    /// Category label (e.g. "Audio").
    pub category: String,
    /// Image URL.
    pub image: String,
}

impl Product {
    /// Create a product priced in US dollars.
    #[must_use]
    pub fn new(
        id: i32,
        name: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price: Price::usd(price),
            category: category.into(),
            image: image.into(),
        }
    }

    /// Case-insensitive substring match against the product name.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keyboard() -> Product {
        Product::new(
            4,
            "Mechanical Keyboard",
            Decimal::from(159),
            "Tech",
            "https://example.test/keyboard.jpg",
        )
    }

    #[test]
    fn test_name_matches_is_case_insensitive() {
        let product = keyboard();
        assert!(product.name_matches("keyboard"));
        assert!(product.name_matches("mechanical k"));
        assert!(!product.name_matches("mouse"));
    }

    #[test]
    fn test_deserialize_with_default_currency() {
        let json = r#"{
            "id": 4,
            "name": "Mechanical Keyboard",
            "price": { "amount": "159" },
            "category": "Tech",
            "image": "https://example.test/keyboard.jpg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product, keyboard());
    }
}
