//! Poom Store Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused by other front-ends.
//!
//! # Modules
//!
//! - [`cart`] - Cart store with change notification
//! - [`api`] - Client for the product and order API
//! - [`catalog`] - Search and category filtering
//! - [`checkout`] - Checkout state machine types
//! - [`view`] - Storefront session state tying the above together
//! - [`render`] / [`shell`] - Terminal front-end used by the `poom` binary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod render;
pub mod shell;
pub mod view;

pub use cart::CartStore;
pub use config::StorefrontConfig;
pub use error::{CatalogFetchError, OrderSubmitError, Result, StorefrontError};
pub use view::{CatalogSource, Storefront};
