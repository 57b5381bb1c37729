//! Store API client implementation.
//!
//! Plain JSON over `reqwest`. There is no caching, retry, or timeout: the
//! catalog is fetched once per session and a failed order is surfaced to the
//! shopper, who decides whether to try again.

use std::fmt;
use std::sync::Arc;

use poom_store_core::{CreateOrderRequest, OrderConfirmation, Product};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::api::ApiError;
use crate::config::StorefrontConfig;

const PRODUCTS_PATH: &str = "api/products";
const ORDERS_PATH: &str = "api/orders";

/// Client for the store's product and order API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct StoreApiClient {
    inner: Arc<StoreApiClientInner>,
}

struct StoreApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl fmt::Debug for StoreApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl StoreApiClient {
    /// Create a client for the API configured in `config`.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self::with_base_url(config.api_url.clone())
    }

    /// Create a client for an explicit base URL.
    #[must_use]
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            inner: Arc::new(StoreApiClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Check the status and decode a JSON body.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            debug!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Store API returned non-success status"
            );
            return Err(ApiError::status(status, &response_text));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            debug!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse store API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Fetch the full product catalog.
    ///
    /// A `null` body is treated as an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success, or
    /// the body is not a list of products.
    #[instrument(skip(self), fields(base_url = %self.inner.base_url))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.inner.base_url.join(PRODUCTS_PATH)?;
        let response = self.inner.client.get(url).send().await?;

        let products: Option<Vec<Product>> = Self::read_json(response).await?;
        let products = products.unwrap_or_default();

        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success, or
    /// the body lacks an `order_id`.
    #[instrument(
        skip(self, request),
        fields(total_amount = %request.total_amount, user_id = %request.user_id)
    )]
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<OrderConfirmation, ApiError> {
        let url = self.inner.base_url.join(ORDERS_PATH)?;
        let response = self.inner.client.post(url).json(request).send().await?;

        let confirmation: OrderConfirmation = Self::read_json(response).await?;

        debug!(order_id = %confirmation.order_id, "Order created");
        Ok(confirmation)
    }
}
