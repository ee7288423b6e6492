//! Order placement.
//!
//! A [`Checkout`] walks one checkout attempt through its phases:
//!
//! ```text
//! Editing ──submit (invalid)──▶ Invalid ──submit (invalid)──▶ Invalid
//!    │                            │
//!    └──submit (valid)──▶ Submitting ◀──submit (valid)──┘
//!                             │
//!                             ▼
//!                          Success (terminal)
//! ```
//!
//! Placing an order only empties the cart; no payment is taken.

use shopease_core::{CartTotals, CheckoutForm, CheckoutPhase, ShippingPolicy, ValidationError};
use thiserror::Error;

use crate::cart::{CartStore, SlotStorage};

/// Errors that stop a submission before validation runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// This checkout already placed its order.
    #[error("This order has already been placed.")]
    AlreadyPlaced,
}

/// What a placed order contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderReceipt {
    /// Distinct products ordered.
    pub lines: usize,
    /// Total units ordered.
    pub items: u64,
    /// Amounts charged.
    pub totals: CartTotals,
}

/// Result of a submission that was allowed to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The order was placed and the cart cleared.
    Placed(OrderReceipt),
    /// Validation failed; nothing changed.
    Rejected(ValidationError),
}

/// One checkout attempt.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    phase: CheckoutPhase,
}

impl Checkout {
    /// Start a checkout in the editing phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Submit the form.
    ///
    /// On validation failure the phase becomes `Invalid` with the first
    /// offending field and the cart is left alone. Otherwise the cart is
    /// cleared and the phase becomes `Success`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AlreadyPlaced`] once the order was placed.
    pub fn submit<S: SlotStorage>(
        &mut self,
        form: &CheckoutForm,
        store: &mut CartStore<S>,
        shipping: &ShippingPolicy,
    ) -> Result<SubmitOutcome, CheckoutError> {
        // `Submitting` only exists inside this call; `&mut self` keeps any
        // other submission from seeing it.
        if self.phase.is_complete() {
            return Err(CheckoutError::AlreadyPlaced);
        }

        if let Err(e) = form.validate() {
            tracing::debug!(field = ?e.field(), error = %e, "Checkout validation failed");
            self.phase = CheckoutPhase::Invalid { field: e.field() };
            return Ok(SubmitOutcome::Rejected(e));
        }

        self.phase = CheckoutPhase::Submitting;

        let cart = store.load();
        let receipt = OrderReceipt {
            lines: cart.len(),
            items: cart.total_quantity(),
            totals: shipping.quote(&cart),
        };
        store.clear();

        tracing::info!(
            lines = receipt.lines,
            items = receipt.items,
            total = receipt.totals.total.amount(),
            "Order placed"
        );

        self.phase = CheckoutPhase::Success;
        Ok(SubmitOutcome::Placed(receipt))
    }
}
