//! Checkout state machine types.
//!
//! ```text
//! Idle --begin (cart non-empty)--> Submitting --complete--> Idle
//!                                       |
//!                                       +--> Placed  (cart cleared, panel closed)
//!                                       +--> Failed  (cart untouched)
//! ```

use poom_store_core::OrderId;
use thiserror::Error;

use crate::error::OrderSubmitError;

/// Reasons a checkout is refused before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,
    /// A submission is already outstanding.
    #[error("an order is already being submitted")]
    InProgress,
}

/// Whether an order submission is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Submitting,
}

/// Result of a submitted checkout, reported back to the shopper.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// The order was created; the cart has been cleared.
    Placed { order_id: OrderId },
    /// The order could not be created; the cart is unchanged.
    Failed(OrderSubmitError),
}

impl CheckoutOutcome {
    /// Whether the order was created.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}
