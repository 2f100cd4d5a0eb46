//! Cart store: the single owner and mutator of the cart.

use std::collections::HashMap;
use std::sync::Arc;

use pocket_shop_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Cart, CartError, CartLine};
use crate::catalog::Catalog;
use crate::storage::{KeyValueStore, StorageError, keys};

/// Snapshot line as read back from storage.
///
/// Older snapshots stored the whole product record with an `id` field next to
/// `quantity`; only the identifier and quantity are kept, everything else is
/// re-joined against the catalog.
#[derive(Debug, Deserialize)]
struct StoredLine {
    #[serde(alias = "id")]
    product_id: ProductId,
    quantity: i64,
}

/// Owns the [`Cart`] and mirrors it to durable storage on every change.
pub struct CartStore {
    cart: Cart,
    catalog: Arc<Catalog>,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the persisted cart snapshot, or start empty.
    ///
    /// An unreadable or malformed snapshot yields an empty cart. Lines for
    /// products no longer in the catalog, non-positive quantities and
    /// duplicate product lines are repaired while loading.
    #[must_use]
    pub fn load(catalog: Arc<Catalog>, storage: Arc<dyn KeyValueStore>) -> Self {
        let cart = match storage.get(keys::CART) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<StoredLine>>(&raw) {
                Ok(stored) => restore(stored, &catalog),
                Err(e) => {
                    warn!(error = %e, "Malformed cart snapshot, starting with an empty cart");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Cart snapshot unavailable, starting with an empty cart");
                Cart::new()
            }
        };

        debug!(lines = cart.len(), items = cart.item_count(), "Cart loaded");

        Self {
            cart,
            catalog,
            storage,
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The catalog lines are priced against.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Add one unit of `product_id`.
    ///
    /// Increments the existing line or appends a new one with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if the product is not in the
    /// catalog; the cart is left untouched.
    pub fn add_item(&mut self, product_id: ProductId) -> Result<(), CartError> {
        if !self.catalog.contains(product_id) {
            return Err(CartError::UnknownProduct(product_id));
        }
        self.cart.increment(product_id);
        debug!(%product_id, quantity = ?self.cart.quantity_of(product_id), "Added to cart");
        self.persist();
        Ok(())
    }

    /// Remove the line for `product_id`. Returns whether anything changed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let removed = self.cart.remove(product_id);
        if removed {
            debug!(%product_id, "Removed from cart");
            self.persist();
        }
        removed
    }

    /// Change the quantity of `product_id` by `delta`.
    ///
    /// A result at or below zero removes the line. Missing lines and a zero
    /// delta are no-ops. Returns whether anything changed.
    pub fn change_quantity(&mut self, product_id: ProductId, delta: i32) -> bool {
        let changed = self.cart.adjust(product_id, delta);
        if changed {
            debug!(%product_id, delta, quantity = ?self.cart.quantity_of(product_id), "Quantity changed");
            self.persist();
        }
        changed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        debug!("Cart cleared");
        self.persist();
    }

    /// Current total price.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total(&self.catalog)
    }

    /// Current total price rounded to two decimal places.
    #[must_use]
    pub fn snapshot_total(&self) -> Decimal {
        self.total().rounded()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Write the cart snapshot. Failures are logged and otherwise ignored;
    /// the in-memory cart remains authoritative for the session.
    fn persist(&self) {
        let result = serde_json::to_string(self.cart.lines())
            .map_err(StorageError::from)
            .and_then(|snapshot| self.storage.set(keys::CART, &snapshot));

        if let Err(e) = result {
            warn!(error = %e, "Failed to persist cart snapshot");
        }
    }
}

/// Rebuild a cart from stored lines, enforcing the cart invariants.
fn restore(stored: Vec<StoredLine>, catalog: &Catalog) -> Cart {
    let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
    let mut positions: HashMap<ProductId, usize> = HashMap::new();

    for StoredLine {
        product_id,
        quantity,
    } in stored
    {
        if !catalog.contains(product_id) {
            warn!(%product_id, "Dropping cart line for unknown product");
            continue;
        }
        if quantity <= 0 {
            warn!(%product_id, quantity, "Dropping cart line with non-positive quantity");
            continue;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        if let Some(line) = positions.get(&product_id).and_then(|&i| lines.get_mut(i)) {
            warn!(%product_id, "Merging duplicate cart line");
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            positions.insert(product_id, lines.len());
            lines.push(CartLine {
                product_id,
                quantity,
            });
        }
    }

    Cart { lines }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    fn store_with(storage: Arc<dyn KeyValueStore>) -> CartStore {
        CartStore::load(Arc::new(Catalog::reference()), storage)
    }

    fn empty_store() -> (CartStore, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        (store_with(storage.clone()), storage)
    }

    /// Reads succeed with nothing stored, every write fails.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable(std::io::Error::other("read-only")))
        }
    }

    #[test]
    fn test_add_same_product_twice() {
        let (mut store, _) = empty_store();
        store.add_item(id(1)).unwrap();
        assert_eq!(store.snapshot_total().to_string(), "349.00");

        store.add_item(id(1)).unwrap();
        assert_eq!(store.cart().lines(), &[CartLine {
            product_id: id(1),
            quantity: 2
        }]);
        assert_eq!(store.snapshot_total().to_string(), "698.00");

        assert!(store.change_quantity(id(1), -2));
        assert!(store.is_empty());
        assert_eq!(store.snapshot_total().to_string(), "0.00");
    }

    #[test]
    fn test_add_unknown_product_is_rejected() {
        let (mut store, storage) = empty_store();
        assert_eq!(
            store.add_item(id(42)),
            Err(CartError::UnknownProduct(id(42)))
        );
        assert!(store.is_empty());
        assert_eq!(storage.get(keys::CART).unwrap(), None);
    }

    #[test]
    fn test_remove_twice_is_idempotent() {
        let (mut store, _) = empty_store();
        store.add_item(id(2)).unwrap();
        store.add_item(id(3)).unwrap();

        assert!(store.remove_item(id(2)));
        let after_first = store.cart().clone();
        assert!(!store.remove_item(id(2)));
        assert_eq!(store.cart(), &after_first);
    }

    #[test]
    fn test_every_mutation_persists() {
        let (mut store, storage) = empty_store();
        store.add_item(id(4)).unwrap();
        assert_eq!(
            storage.get(keys::CART).unwrap().as_deref(),
            Some(r#"[{"product_id":4,"quantity":1}]"#)
        );

        store.change_quantity(id(4), 2);
        assert_eq!(
            storage.get(keys::CART).unwrap().as_deref(),
            Some(r#"[{"product_id":4,"quantity":3}]"#)
        );

        store.clear();
        assert_eq!(storage.get(keys::CART).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_reload_reproduces_cart() {
        let (mut store, storage) = empty_store();
        store.add_item(id(5)).unwrap();
        store.add_item(id(2)).unwrap();
        store.add_item(id(5)).unwrap();

        let reloaded = store_with(storage);
        assert_eq!(reloaded.cart(), store.cart());
        assert_eq!(reloaded.snapshot_total(), store.snapshot_total());
    }

    #[test]
    fn test_load_legacy_denormalized_snapshot() {
        let legacy = r#"[
            {"id": 1, "name": "Sony WH-1000XM5", "price": 1, "category": "Audio", "image": "x", "quantity": 2},
            {"id": 6, "name": "PlayStation 5 Controller", "price": 69, "category": "Gaming", "image": "y", "quantity": 1}
        ]"#;
        let storage = Arc::new(MemoryStore::with_entries([(keys::CART, legacy)]));
        let store = store_with(storage);

        assert_eq!(store.cart().quantity_of(id(1)), Some(2));
        // Price comes from the catalog, not the stale snapshot.
        assert_eq!(store.total().display(), "$767.00");
    }

    #[test]
    fn test_load_repairs_invalid_lines() {
        let snapshot = r#"[
            {"product_id": 3, "quantity": 1},
            {"product_id": 99, "quantity": 1},
            {"product_id": 4, "quantity": 0},
            {"product_id": 3, "quantity": 2}
        ]"#;
        let storage = Arc::new(MemoryStore::with_entries([(keys::CART, snapshot)]));
        let store = store_with(storage);

        assert_eq!(store.cart().lines(), &[CartLine {
            product_id: id(3),
            quantity: 3
        }]);
    }

    #[test]
    fn test_load_malformed_snapshot_starts_empty() {
        let storage = Arc::new(MemoryStore::with_entries([(keys::CART, "null")]));
        assert!(store_with(storage).is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_authoritative() {
        let mut store = store_with(Arc::new(ReadOnlyStore));
        store.add_item(id(1)).unwrap();
        store.add_item(id(1)).unwrap();
        assert_eq!(store.item_count(), 2);
    }

    #[test]
    fn test_invariants_hold_over_mixed_operations() {
        let (mut store, _) = empty_store();
        let ops: [(i32, i32); 12] = [
            (1, 0),
            (2, 0),
            (1, 0),
            (3, 5),
            (2, -1),
            (6, 0),
            (1, -1),
            (6, 3),
            (4, 0),
            (6, -10),
            (4, 2),
            (1, 1),
        ];

        for (product, delta) in ops {
            if delta == 0 {
                store.add_item(id(product)).unwrap();
            } else {
                store.change_quantity(id(product), delta);
            }

            let lines = store.cart().lines();
            let mut seen = std::collections::HashSet::new();
            for line in lines {
                assert!(line.quantity >= 1);
                assert!(seen.insert(line.product_id));
            }
            let expected: Decimal = lines
                .iter()
                .map(|l| {
                    store.catalog().get(l.product_id).unwrap().price.amount
                        * Decimal::from(l.quantity)
                })
                .sum();
            assert_eq!(store.total().amount, expected);
        }
    }
}
