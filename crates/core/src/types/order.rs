//! Order submission payloads.

use serde::{Deserialize, Serialize};

use crate::types::id::{OrderId, UserId};
use crate::types::price::Price;

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Cart total at the moment of submission.
    pub total_amount: Price,
    pub user_id: UserId,
}

/// Successful response from `POST /api/orders`.
///
/// Only `order_id` is required, as a string or a number; any other fields the
/// API returns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
}
