//! Checkout and simulated payment.
//!
//! A checkout attempt opens the payment modal, then a confirmed payment walks
//! a timed state machine:
//!
//! ```text
//! Idle --confirm--> Processing --(processing delay)--> Success
//!      <--cleanup-- (clear cart, notice, close modal) <--(success delay)--
//! ```
//!
//! The pay control is disabled from `Processing` until cleanup returns the
//! flow to `Idle`, so at most one payment runs at a time. Closing the modal
//! does not cancel a running payment; its timers always run to completion.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pocket_shop_core::PaymentStage;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{Instrument, info, info_span};

/// Default time spent in `Processing`.
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_millis(2000);

/// Default time spent showing `Success` before cleanup.
pub const DEFAULT_SUCCESS_DELAY: Duration = Duration::from_millis(1000);

/// Errors raised when starting a checkout or payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// There is nothing to pay for.
    #[error("cart is empty")]
    EmptyCart,

    /// The pay control is disabled while a payment runs.
    #[error("a payment is already in progress")]
    PaymentInProgress,
}

/// Simulated payment timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentDelays {
    /// Time between confirming and `Success`.
    pub processing: Duration,
    /// Time between `Success` and cleanup.
    pub success: Duration,
}

impl Default for PaymentDelays {
    fn default() -> Self {
        Self {
            processing: DEFAULT_PROCESSING_DELAY,
            success: DEFAULT_SUCCESS_DELAY,
        }
    }
}

/// Payment modal display state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentModal {
    pub open: bool,
    /// Formatted amount due, captured when the modal opened.
    pub amount: String,
}

/// Pay control display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayButtonView {
    pub stage: PaymentStage,
    pub label: &'static str,
    pub enabled: bool,
}

impl From<PaymentStage> for PayButtonView {
    fn from(stage: PaymentStage) -> Self {
        Self {
            stage,
            label: stage.label(),
            enabled: stage.control_enabled(),
        }
    }
}

/// Handle to a running payment.
#[derive(Debug)]
pub struct PaymentHandle {
    task: JoinHandle<()>,
}

impl PaymentHandle {
    /// Wait until cleanup has run.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment task panicked.
    pub async fn finished(self) -> Result<(), JoinError> {
        self.task.await
    }
}

/// The payment state machine.
#[derive(Debug)]
pub struct PaymentFlow {
    delays: PaymentDelays,
    stage: watch::Sender<PaymentStage>,
    modal: Mutex<PaymentModal>,
}

impl PaymentFlow {
    /// Create an idle flow with a closed modal.
    #[must_use]
    pub fn new(delays: PaymentDelays) -> Self {
        let (stage, _) = watch::channel(PaymentStage::Idle);
        Self {
            delays,
            stage,
            modal: Mutex::new(PaymentModal::default()),
        }
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> PaymentStage {
        *self.stage.borrow()
    }

    /// Observe stage changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PaymentStage> {
        self.stage.subscribe()
    }

    /// Current modal state.
    #[must_use]
    pub fn modal(&self) -> PaymentModal {
        self.modal_guard().clone()
    }

    /// Open the modal showing `amount`.
    pub fn open_modal(&self, amount: String) {
        *self.modal_guard() = PaymentModal { open: true, amount };
    }

    /// Close the modal. A running payment keeps going.
    pub fn close_modal(&self) {
        self.modal_guard().open = false;
    }

    /// Start a payment: move `Idle -> Processing` and spawn the timed
    /// sequence, calling `cleanup` once after the success delay.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::PaymentInProgress`] unless the flow is idle.
    pub fn start<F>(self: &Arc<Self>, cleanup: F) -> Result<PaymentHandle, CheckoutError>
    where
        F: FnOnce() + Send + 'static,
    {
        let started = self.stage.send_if_modified(|stage| {
            if *stage == PaymentStage::Idle {
                *stage = PaymentStage::Processing;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(CheckoutError::PaymentInProgress);
        }
        info!("Payment processing");

        let flow = Arc::clone(self);
        let task = tokio::spawn(
            async move {
                tokio::time::sleep(flow.delays.processing).await;
                flow.stage.send_replace(PaymentStage::Success);
                info!("Payment succeeded");

                tokio::time::sleep(flow.delays.success).await;
                cleanup();
                flow.close_modal();
                flow.stage.send_replace(PaymentStage::Idle);
                info!("Payment flow reset");
            }
            .instrument(info_span!("payment")),
        );

        Ok(PaymentHandle { task })
    }

    fn modal_guard(&self) -> MutexGuard<'_, PaymentModal> {
        self.modal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PaymentFlow {
    fn default() -> Self {
        Self::new(PaymentDelays::default())
    }
}
