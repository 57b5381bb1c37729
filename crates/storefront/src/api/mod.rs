//! Client for the store's product and order API.
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/products   - Catalog (JSON array of products, or null)
//! POST /api/orders     - Create order from { total_amount, user_id }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use poom_store_storefront::api::StoreApiClient;
//!
//! let client = StoreApiClient::new(&config);
//! let products = client.get_products().await?;
//! ```

mod client;

pub use client::StoreApiClient;

use thiserror::Error;

/// Maximum number of response body characters kept for error reporting.
const ERROR_BODY_LIMIT: usize = 200;

/// Errors that can occur when talking to the store API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built from the configured base URL.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Build a status error, keeping only the head of the body.
    pub(crate) fn status(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Status {
            status: status.as_u16(),
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        }
    }
}
