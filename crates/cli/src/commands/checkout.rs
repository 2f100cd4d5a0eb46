//! Checkout command.
//!
//! Opens the payment modal, confirms the payment and waits for cleanup,
//! logging each stage of the pay control as it changes.

use pocket_shop_core::PaymentStage;
use pocket_shop_storefront::notices::{self, Notice};
use pocket_shop_storefront::shop::Shop;
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::CliError;

/// Pay for the current cart.
///
/// # Errors
///
/// - `CliError::Checkout` if the cart is empty or a payment is running
/// - `CliError::Task` if the payment task panicked
pub async fn run(shop: &Shop) -> Result<(), CliError> {
    let mut pending = shop.notices().subscribe();

    let modal = match shop.on_checkout() {
        Ok(modal) => modal,
        Err(e) => {
            report(&mut pending);
            return Err(e.into());
        }
    };
    info!(amount = %modal.amount, "Payment modal opened");

    let mut stages = shop.subscribe_payment();
    let handle = shop.on_confirm_payment()?;

    let watcher = tokio::spawn(async move {
        while stages.changed().await.is_ok() {
            let stage = *stages.borrow_and_update();
            info!(%stage, "{}", stage.label());
            if stage == PaymentStage::Idle {
                break;
            }
        }
    });

    handle.finished().await?;
    watcher.await?;
    report(&mut pending);
    Ok(())
}

fn report(pending: &mut broadcast::Receiver<Notice>) {
    for notice in notices::drain(pending) {
        if notice.is_warning() {
            warn!("{}", notice.message());
        } else {
            info!("{}", notice.message());
        }
    }
}
