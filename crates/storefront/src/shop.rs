//! The shop: one explicit state object behind every user interaction.
//!
//! [`Shop`] owns the catalog, the cart store, the theme preference, the
//! notice hub and the payment flow. Every user trigger is a method on it,
//! and every cart trigger returns the freshly projected [`CartView`], so the
//! presentation is always re-synced after a mutation.
//!
//! The cart sits behind a `std::sync::Mutex`. Guards are only ever held for
//! the duration of a synchronous cart operation, never across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pocket_shop_core::{PaymentStage, ProductId, Theme};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::cart::{CartError, CartStore};
use crate::catalog::Catalog;
use crate::checkout::{
    CheckoutError, PayButtonView, PaymentDelays, PaymentFlow, PaymentHandle, PaymentModal,
};
use crate::notices::{Notice, Notices, OrderConfirmation};
use crate::storage::KeyValueStore;
use crate::theme::ThemeStore;
use crate::view::{CartView, ProductCardView, product_cards};

/// Shared shop state.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Shop {
    inner: Arc<ShopInner>,
}

struct ShopInner {
    catalog: Arc<Catalog>,
    cart: Mutex<CartStore>,
    theme: Mutex<ThemeStore>,
    notices: Notices,
    payment: Arc<PaymentFlow>,
}

impl std::fmt::Debug for Shop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shop")
            .field("products", &self.inner.catalog.len())
            .field("payment", &self.inner.payment.stage())
            .finish_non_exhaustive()
    }
}

impl Shop {
    /// Build a shop, loading the persisted cart and theme from `storage`.
    #[must_use]
    pub fn new(catalog: Catalog, storage: Arc<dyn KeyValueStore>, delays: PaymentDelays) -> Self {
        let catalog = Arc::new(catalog);
        let cart = CartStore::load(Arc::clone(&catalog), Arc::clone(&storage));
        let theme = ThemeStore::load(storage);

        info!(
            products = catalog.len(),
            cart_items = cart.item_count(),
            theme = %theme.current(),
            "Shop initialized"
        );

        Self {
            inner: Arc::new(ShopInner {
                catalog,
                cart: Mutex::new(cart),
                theme: Mutex::new(theme),
                notices: Notices::new(),
                payment: Arc::new(PaymentFlow::new(delays)),
            }),
        }
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// The product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// The notice hub.
    #[must_use]
    pub fn notices(&self) -> &Notices {
        &self.inner.notices
    }

    /// Current cart projection.
    #[must_use]
    pub fn cart_view(&self) -> CartView {
        let store = self.cart();
        CartView::project(store.cart(), store.catalog())
    }

    /// Total units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart().item_count()
    }

    /// Cart total rounded to two decimal places.
    #[must_use]
    pub fn snapshot_total(&self) -> Decimal {
        self.cart().snapshot_total()
    }

    /// Active theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme_store().current()
    }

    /// Current payment stage.
    #[must_use]
    pub fn payment_stage(&self) -> PaymentStage {
        self.inner.payment.stage()
    }

    /// Observe payment stage changes.
    #[must_use]
    pub fn subscribe_payment(&self) -> tokio::sync::watch::Receiver<PaymentStage> {
        self.inner.payment.subscribe()
    }

    /// Pay control projection.
    #[must_use]
    pub fn pay_button(&self) -> PayButtonView {
        PayButtonView::from(self.payment_stage())
    }

    /// Payment modal projection.
    #[must_use]
    pub fn modal(&self) -> PaymentModal {
        self.inner.payment.modal()
    }

    // =========================================================================
    // Cart triggers
    // =========================================================================

    /// Add one unit of `product_id` to the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::UnknownProduct`] (and a notice) if the product is not
    ///   in the catalog
    /// - [`CartError::Locked`] (and a notice) while a payment runs
    pub fn on_add_to_cart(&self, product_id: ProductId) -> Result<CartView, CartError> {
        let Some(mut store) = self.editable_cart() else {
            return Err(CartError::Locked);
        };
        if let Err(e) = store.add_item(product_id) {
            drop(store);
            warn!(%product_id, "Add to cart rejected: unknown product");
            self.notices()
                .publish(Notice::UnknownProduct { product_id });
            return Err(e);
        }
        Ok(CartView::project(store.cart(), store.catalog()))
    }

    /// Remove the line for `product_id`, if any.
    ///
    /// While a payment runs the cart is left as is.
    pub fn on_remove_from_cart(&self, product_id: ProductId) -> CartView {
        match self.editable_cart() {
            Some(mut store) => {
                store.remove_item(product_id);
                CartView::project(store.cart(), store.catalog())
            }
            None => self.cart_view(),
        }
    }

    /// Change the quantity of `product_id` by `delta`.
    ///
    /// While a payment runs the cart is left as is.
    pub fn on_change_quantity(&self, product_id: ProductId, delta: i32) -> CartView {
        match self.editable_cart() {
            Some(mut store) => {
                store.change_quantity(product_id, delta);
                CartView::project(store.cart(), store.catalog())
            }
            None => self.cart_view(),
        }
    }

    /// Empty the cart.
    ///
    /// While a payment runs the cart is left as is.
    pub fn clear_cart(&self) -> CartView {
        match self.editable_cart() {
            Some(mut store) => {
                store.clear();
                CartView::project(store.cart(), store.catalog())
            }
            None => self.cart_view(),
        }
    }

    // =========================================================================
    // Catalog triggers
    // =========================================================================

    /// Product cards whose name contains `query`, ignoring case.
    #[must_use]
    pub fn on_search(&self, query: &str) -> Vec<ProductCardView> {
        product_cards(self.catalog().search(query))
    }

    // =========================================================================
    // Checkout triggers
    // =========================================================================

    /// Open the payment modal for the current cart total.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] (and publishes a notice) if the
    /// cart is empty; the payment flow stays idle.
    pub fn on_checkout(&self) -> Result<PaymentModal, CheckoutError> {
        let total = {
            let store = self.cart();
            if store.is_empty() {
                None
            } else {
                Some(store.total())
            }
        };

        let Some(total) = total else {
            info!("Checkout attempted with an empty cart");
            self.notices().publish(Notice::CartEmpty);
            return Err(CheckoutError::EmptyCart);
        };

        self.inner.payment.open_modal(total.display());
        info!(total = %total, "Checkout opened");
        Ok(self.modal())
    }

    /// Confirm payment and start the timed payment sequence.
    ///
    /// The charged amount is the cart total at confirmation. The cart stays
    /// locked until cleanup clears it, publishes the order confirmation and
    /// closes the modal.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::PaymentInProgress`] while a previous payment runs
    /// - [`CheckoutError::EmptyCart`] if the cart has been emptied
    pub fn on_confirm_payment(&self) -> Result<PaymentHandle, CheckoutError> {
        if !self.payment_stage().control_enabled() {
            return Err(CheckoutError::PaymentInProgress);
        }

        // Held until the stage leaves Idle, so no edit slips in between
        // pricing the cart and locking it.
        let store = self.cart();
        if store.is_empty() {
            drop(store);
            self.notices().publish(Notice::CartEmpty);
            return Err(CheckoutError::EmptyCart);
        }
        let total = store.total();

        let shop = self.clone();
        let started = self.inner.payment.start(move || {
            shop.cart().clear();
            let order = OrderConfirmation::new(total);
            info!(reference = %order.reference, total = %order.total, "Order placed");
            shop.notices().publish(Notice::OrderPlaced(order));
        });
        drop(store);
        started
    }

    /// Close the payment modal without cancelling a running payment.
    pub fn on_close_payment(&self) {
        self.inner.payment.close_modal();
    }

    // =========================================================================
    // Theme triggers
    // =========================================================================

    /// Switch between light and dark. Returns the new theme.
    pub fn on_toggle_theme(&self) -> Theme {
        self.theme_store().toggle()
    }

    /// The cart guard, or `None` (and a notice) while a payment runs.
    fn editable_cart(&self) -> Option<MutexGuard<'_, CartStore>> {
        let store = self.cart();
        if self.payment_stage().control_enabled() {
            return Some(store);
        }
        drop(store);
        info!(stage = %self.payment_stage(), "Cart change refused during payment");
        self.notices().publish(Notice::CartLocked);
        None
    }

    fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn theme_store(&self) -> MutexGuard<'_, ThemeStore> {
        self.inner
            .theme
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notices::drain;
    use crate::storage::{MemoryStore, keys};

    fn shop() -> (Shop, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        let shop = Shop::new(
            Catalog::reference(),
            storage.clone(),
            PaymentDelays::default(),
        );
        (shop, storage)
    }

    #[test]
    fn test_cart_triggers_return_synced_view() {
        let (shop, _) = shop();
        let view = shop.on_add_to_cart(ProductId::new(1)).unwrap();
        assert_eq!(view.total, "$349.00");
        assert_eq!(view.item_count, 1);

        let view = shop.on_add_to_cart(ProductId::new(1)).unwrap();
        assert_eq!(view.total, "$698.00");
        assert_eq!(view.items.len(), 1);

        let view = shop.on_change_quantity(ProductId::new(1), -2);
        assert!(view.is_empty);
        assert_eq!(view.total, "$0.00");
    }

    #[test]
    fn test_unknown_product_publishes_notice() {
        let (shop, _) = shop();
        let mut rx = shop.notices().subscribe();
        assert_eq!(
            shop.on_add_to_cart(ProductId::new(77)).unwrap_err(),
            CartError::UnknownProduct(ProductId::new(77))
        );
        assert_eq!(drain(&mut rx), vec![Notice::UnknownProduct {
            product_id: ProductId::new(77)
        }]);
    }

    #[test]
    fn test_search_does_not_touch_cart() {
        let (shop, storage) = shop();
        let cards = shop.on_search("keyboard");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Mechanical Keyboard");
        assert_eq!(shop.item_count(), 0);
        assert_eq!(storage.get(keys::CART).unwrap(), None);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let (shop, _) = shop();
        let mut rx = shop.notices().subscribe();
        assert_eq!(shop.on_checkout().unwrap_err(), CheckoutError::EmptyCart);
        assert_eq!(shop.payment_stage(), PaymentStage::Idle);
        assert!(!shop.modal().open);
        assert_eq!(drain(&mut rx), vec![Notice::CartEmpty]);
    }

    #[test]
    fn test_checkout_opens_modal_with_total() {
        let (shop, _) = shop();
        shop.on_add_to_cart(ProductId::new(3)).unwrap();
        let modal = shop.on_checkout().unwrap();
        assert!(modal.open);
        assert_eq!(modal.amount, "$129.00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_payment_runs_to_cleanup() {
        let (shop, storage) = shop();
        let mut rx = shop.notices().subscribe();
        shop.on_add_to_cart(ProductId::new(2)).unwrap();
        shop.on_checkout().unwrap();

        let handle = shop.on_confirm_payment().unwrap();
        assert_eq!(shop.payment_stage(), PaymentStage::Processing);
        assert!(!shop.pay_button().enabled);
        assert_eq!(
            shop.on_confirm_payment().unwrap_err(),
            CheckoutError::PaymentInProgress
        );

        handle.finished().await.unwrap();
        assert_eq!(shop.payment_stage(), PaymentStage::Idle);
        assert!(shop.pay_button().enabled);
        assert!(!shop.modal().open);
        assert_eq!(shop.item_count(), 0);
        assert_eq!(storage.get(keys::CART).unwrap().as_deref(), Some("[]"));

        let notices = drain(&mut rx);
        let Some(Notice::OrderPlaced(order)) = notices.last() else {
            panic!("expected an order confirmation, got {notices:?}");
        };
        assert_eq!(order.total.display(), "$799.00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_is_locked_while_payment_runs() {
        let (shop, storage) = shop();
        shop.on_add_to_cart(ProductId::new(6)).unwrap();
        shop.on_checkout().unwrap();
        let handle = shop.on_confirm_payment().unwrap();

        let mut rx = shop.notices().subscribe();
        assert_eq!(
            shop.on_add_to_cart(ProductId::new(2)).unwrap_err(),
            CartError::Locked
        );
        let view = shop.on_change_quantity(ProductId::new(6), 3);
        assert_eq!(view.item_count, 1);
        assert_eq!(shop.on_remove_from_cart(ProductId::new(6)).item_count, 1);
        assert_eq!(shop.clear_cart().total, "$69.00");
        assert_eq!(drain(&mut rx), vec![Notice::CartLocked; 4]);

        handle.finished().await.unwrap();
        let notices = drain(&mut rx);
        let Some(Notice::OrderPlaced(order)) = notices.last() else {
            panic!("expected an order confirmation, got {notices:?}");
        };
        assert_eq!(order.total.display(), "$69.00");
        assert_eq!(shop.item_count(), 0);
        assert_eq!(storage.get(keys::CART).unwrap().as_deref(), Some("[]"));

        let view = shop.on_add_to_cart(ProductId::new(2)).unwrap();
        assert_eq!(view.total, "$799.00");
    }

    #[tokio::test]
    async fn test_confirm_payment_with_empty_cart() {
        let (shop, _) = shop();
        assert_eq!(
            shop.on_confirm_payment().unwrap_err(),
            CheckoutError::EmptyCart
        );
        assert_eq!(shop.payment_stage(), PaymentStage::Idle);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let (shop, storage) = shop();
        assert_eq!(shop.theme(), Theme::Dark);
        assert_eq!(shop.on_toggle_theme(), Theme::Light);
        assert_eq!(storage.get(keys::THEME).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_state_survives_restart() {
        let (shop, storage) = shop();
        shop.on_add_to_cart(ProductId::new(5)).unwrap();
        shop.on_add_to_cart(ProductId::new(6)).unwrap();
        shop.on_toggle_theme();

        let restarted = Shop::new(Catalog::reference(), storage, PaymentDelays::default());
        assert_eq!(restarted.cart_view(), shop.cart_view());
        assert_eq!(restarted.theme(), Theme::Light);
    }
}
