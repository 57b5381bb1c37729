//! Poom Store Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront library, the
//! `poom` binary, and the integration tests.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no runtime.
//! This keeps it lightweight and lets any front-end depend on it.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, products, cart items, and order payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
