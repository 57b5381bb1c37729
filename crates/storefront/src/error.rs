//! Unified error handling with Sentry integration.
//!
//! The storefront recognises exactly two failure kinds at its boundary:
//! [`CatalogFetchError`] and [`OrderSubmitError`]. Neither distinguishes a
//! dead network from a server error or a malformed body; the wrapped
//! [`ApiError`] only exists so logs can say which one happened.

use poom_store_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Anything that went wrong reaching or parsing the product endpoint.
#[derive(Debug, Error)]
#[error("Failed to fetch catalog: {0}")]
pub struct CatalogFetchError(#[source] pub ApiError);

/// Anything that went wrong reaching, or a non-success response from, the
/// order endpoint.
#[derive(Debug, Error)]
#[error("Failed to submit order: {0}")]
pub struct OrderSubmitError(#[source] pub ApiError);

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog could not be fetched.
    #[error(transparent)]
    Catalog(#[from] CatalogFetchError),

    /// Order could not be submitted.
    #[error(transparent)]
    Order(#[from] OrderSubmitError),

    /// Checkout was refused before any request was made.
    #[error("Checkout refused: {0}")]
    Checkout(#[from] CheckoutError),

    /// Reading shopper input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Build the Sentry breadcrumb recorded after a cart mutation.
///
/// Carries the affected product (if any) and the cart's unit count after the
/// change, so an error report shows how the cart got to its final state.
#[must_use]
pub fn cart_breadcrumb(
    action: &str,
    product_id: Option<ProductId>,
    total_items: u64,
) -> sentry::Breadcrumb {
    let mut breadcrumb = sentry::Breadcrumb {
        ty: "user".to_string(),
        category: Some("cart".to_string()),
        message: Some(action.to_string()),
        ..Default::default()
    };

    if let Some(id) = product_id {
        breadcrumb
            .data
            .insert("product_id".to_string(), serde_json::Value::from(id.as_i64()));
    }
    breadcrumb
        .data
        .insert("total_items".to_string(), serde_json::Value::from(total_items));

    breadcrumb
}
