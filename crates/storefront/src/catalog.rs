//! Product catalog.
//!
//! The catalog is a fixed, read-only list of products defined at startup.
//! It is shared by the cart store (to validate and price lines) and the
//! product grid (to render and search).

use std::collections::HashSet;
use std::path::Path;

use pocket_shop_core::{Product, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while building a [`Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two products share an identifier.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),

    /// A product has a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// The catalog file could not be read.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file is not a JSON product array.
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, preserving product order.
    ///
    /// # Errors
    ///
    /// Returns an error if two products share an identifier or a price is negative.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.price.amount.is_sign_negative() {
                return Err(CatalogError::NegativePrice(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Load a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails
    /// [`Catalog::new`] validation.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&content)?;
        Self::new(products)
    }

    /// The built-in six product catalog.
    #[must_use]
    pub fn reference() -> Self {
        let products = vec![
            Product::new(
                1,
                "Sony WH-1000XM5",
                Decimal::from(349),
                "Audio",
                "https://images.unsplash.com/photo-1616469829581-73993eb86b02?auto=format&fit=crop&w=500&q=60",
            ),
            Product::new(
                2,
                "Apple Watch Ultra",
                Decimal::from(799),
                "Wearables",
                "https://images.unsplash.com/photo-1673308891251-872fa82a1599?auto=format&fit=crop&w=500&q=60",
            ),
            Product::new(
                3,
                "Nike Air Max 90",
                Decimal::from(129),
                "Fashion",
                "https://images.unsplash.com/photo-1542291026-7eec264c27ff?auto=format&fit=crop&w=500&q=60",
            ),
            Product::new(
                4,
                "Mechanical Keyboard",
                Decimal::from(159),
                "Tech",
                "https://images.unsplash.com/photo-1595225476474-87563907a212?auto=format&fit=crop&w=500&q=60",
            ),
            Product::new(
                5,
                "RayBan Aviator",
                Decimal::from(199),
                "Fashion",
                "https://images.unsplash.com/photo-1572635196237-14b3f281503f?auto=format&fit=crop&w=500&q=60",
            ),
            Product::new(
                6,
                "PlayStation 5 Controller",
                Decimal::from(69),
                "Gaming",
                "https://images.unsplash.com/photo-1606318801954-d46d46d3360a?auto=format&fit=crop&w=500&q=60",
            ),
        ];
        Self { products }
    }

    /// Look up a product by identifier.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Whether the catalog defines `id`.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products whose name contains `query`, ignoring case.
    ///
    /// Surrounding whitespace is ignored and an empty query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| needle.is_empty() || p.name_matches(&needle))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::reference()
    }
}
