//! Core types for Poom Store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart_item;
pub mod id;
pub mod order;
pub mod price;
pub mod product;

pub use cart_item::CartItem;
pub use id::*;
pub use order::{CreateOrderRequest, OrderConfirmation};
pub use price::{CURRENCY_SYMBOL, Price, PriceError};
pub use product::{PLACEHOLDER_IMAGE_URL, Product};
