//! User-visible notices.
//!
//! Notices are fire-and-forget: publishing never blocks and never fails, and
//! nobody acknowledges them. The HTTP layer drains them into a toast, the CLI
//! prints them.

use chrono::{DateTime, Utc};
use pocket_shop_core::{Price, ProductId};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Buffered notices per subscriber before the oldest are dropped.
const NOTICE_CAPACITY: usize = 32;

/// Receipt for a completed (simulated) payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    /// Random order reference.
    pub reference: Uuid,
    /// Amount charged.
    pub total: Price,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// Confirmation for `total` placed now.
    #[must_use]
    pub fn new(total: Price) -> Self {
        Self {
            reference: Uuid::new_v4(),
            total,
            placed_at: Utc::now(),
        }
    }
}

/// A message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Checkout was attempted with nothing in the cart.
    CartEmpty,
    /// A product reference did not resolve.
    UnknownProduct { product_id: ProductId },
    /// A cart change was refused because a payment is running.
    CartLocked,
    /// The payment completed and the cart was cleared.
    OrderPlaced(OrderConfirmation),
}

impl Notice {
    /// Human-readable text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::CartEmpty => "Cart is empty!".to_string(),
            Self::CartLocked => "Your cart is locked until the payment completes.".to_string(),
            Self::UnknownProduct { product_id } => {
                format!("Product {product_id} is no longer available.")
            }
            Self::OrderPlaced(order) => format!(
                "Order Placed Successfully! Total: {} (ref {})",
                order.total,
                order.reference.simple()
            ),
        }
    }

    /// Whether this is a warning rather than a confirmation.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        !matches!(self, Self::OrderPlaced(_))
    }
}

/// Broadcast hub for [`Notice`]s.
#[derive(Debug, Clone)]
pub struct Notices {
    tx: broadcast::Sender<Notice>,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

impl Notices {
    /// Create a hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTICE_CAPACITY);
        Self { tx }
    }

    /// Publish a notice to every current subscriber.
    pub fn publish(&self, notice: Notice) {
        debug!(?notice, "Notice");
        // No subscribers is fine: nobody is looking.
        let _ = self.tx.send(notice);
    }

    /// Receive notices published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }
}

/// Take every notice currently buffered in `rx` without waiting.
///
/// Notices lost to lagging are skipped.
pub fn drain(rx: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(notice) => notices.push(notice),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                debug!(skipped, "Notice subscriber lagged");
            }
            Err(_) => break,
        }
    }
    notices
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        Notices::new().publish(Notice::CartEmpty);
    }

    #[test]
    fn test_drain_returns_in_order() {
        let notices = Notices::new();
        let mut rx = notices.subscribe();
        notices.publish(Notice::CartEmpty);
        notices.publish(Notice::UnknownProduct {
            product_id: ProductId::new(9),
        });

        let drained = drain(&mut rx);
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], Notice::CartEmpty);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_drain_skips_lagged() {
        let notices = Notices::new();
        let mut rx = notices.subscribe();
        for _ in 0..(NOTICE_CAPACITY + 5) {
            notices.publish(Notice::CartEmpty);
        }
        assert_eq!(drain(&mut rx).len(), NOTICE_CAPACITY);
    }

    #[test]
    fn test_order_placed_message() {
        let order = OrderConfirmation::new(Price::usd(Decimal::from(698)));
        let notice = Notice::OrderPlaced(order);
        assert!(notice.message().starts_with("Order Placed Successfully! Total: $698.00"));
        assert!(!notice.is_warning());
        assert!(Notice::CartEmpty.is_warning());
        assert!(Notice::CartLocked.is_warning());
    }
}
