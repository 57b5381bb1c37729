//! Storefront view state.
//!
//! Owns the catalog, the [`CartStore`], the filter selection, and the three
//! UI flags (`is_loading`, `is_cart_open`, `is_checking_out`). Front-ends read
//! this state to render and call its methods in response to shopper events.

use poom_store_core::{CreateOrderRequest, OrderConfirmation, Product, ProductId, UserId};
use tracing::{error, info, instrument, warn};

use crate::api::StoreApiClient;
use crate::cart::CartStore;
use crate::catalog::{CategoryFilter, ProductFilter, placeholder_catalog};
use crate::checkout::{CheckoutError, CheckoutOutcome, CheckoutPhase};
use crate::config::StorefrontConfig;
use crate::error::{CatalogFetchError, OrderSubmitError};

/// Where the displayed catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fetched from the product endpoint.
    Remote,
    /// The fetch failed and the placeholder catalog is shown instead.
    Placeholder,
}

/// A shopper's storefront session.
#[derive(Debug)]
pub struct Storefront {
    api: StoreApiClient,
    user_id: UserId,
    products: Vec<Product>,
    filter: ProductFilter,
    cart: CartStore,
    is_loading: bool,
    is_cart_open: bool,
    checkout: CheckoutPhase,
}

impl Storefront {
    /// Create a session. The catalog starts empty with `is_loading` set
    /// until [`Storefront::load_catalog`] completes.
    #[must_use]
    pub fn new(api: StoreApiClient, user_id: UserId) -> Self {
        Self {
            api,
            user_id,
            products: Vec::new(),
            filter: ProductFilter::default(),
            cart: CartStore::new(),
            is_loading: true,
            is_cart_open: false,
            checkout: CheckoutPhase::Idle,
        }
    }

    /// Create a session from configuration.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(StoreApiClient::new(config), config.user_id)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the catalog once.
    ///
    /// Never fails: any error is logged and the placeholder catalog is shown.
    #[instrument(skip(self))]
    pub async fn load_catalog(&mut self) -> CatalogSource {
        self.is_loading = true;

        let source = match self.api.get_products().await.map_err(CatalogFetchError) {
            Ok(products) => {
                info!(count = products.len(), "Catalog loaded");
                self.products = products;
                CatalogSource::Remote
            }
            Err(e) => {
                error!(error = %e, "Catalog fetch failed, showing placeholder catalog");
                self.products = placeholder_catalog();
                CatalogSource::Placeholder
            }
        };

        self.is_loading = false;
        source
    }

    /// Every product in the catalog.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products passing the current filter.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        self.filter.apply(&self.products)
    }

    /// Current filter.
    #[must_use]
    pub const fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    /// Set the search text.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.search_query = query.into();
    }

    /// Set the category selection.
    pub fn select_category(&mut self, category: CategoryFilter) {
        self.filter.category = category;
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Read access to the cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Mutable access to the cart, for its mutators and subscriptions.
    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Add one unit of the catalog product `id`.
    ///
    /// Returns `false` if no such product is in the catalog.
    pub fn add_to_cart(&mut self, id: ProductId) -> bool {
        let Some(product) = self.products.iter().find(|p| p.id == id) else {
            warn!(product_id = %id, "Product not in catalog");
            return false;
        };
        self.cart.add_to_cart(product);
        true
    }

    /// Remove the cart line for `id`.
    pub fn remove_from_cart(&mut self, id: ProductId) {
        self.cart.remove_from_cart(id);
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Whether the catalog fetch is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the cart panel is shown.
    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        self.is_cart_open
    }

    /// Whether an order submission is outstanding.
    #[must_use]
    pub fn is_checking_out(&self) -> bool {
        self.checkout == CheckoutPhase::Submitting
    }

    /// Show the cart panel.
    pub const fn open_cart(&mut self) {
        self.is_cart_open = true;
    }

    /// Hide the cart panel.
    pub const fn close_cart(&mut self) {
        self.is_cart_open = false;
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Client used for order submission, for front-ends that send the
    /// request themselves between [`Self::begin_checkout`] and
    /// [`Self::complete_checkout`].
    #[must_use]
    pub const fn api(&self) -> &StoreApiClient {
        &self.api
    }

    /// Move from Idle to Submitting and build the order request.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InProgress`] while a submission is outstanding
    /// and [`CheckoutError::EmptyCart`] if there is nothing to order. Neither
    /// changes any state.
    pub fn begin_checkout(&mut self) -> Result<CreateOrderRequest, CheckoutError> {
        if self.is_checking_out() {
            return Err(CheckoutError::InProgress);
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.checkout = CheckoutPhase::Submitting;
        Ok(CreateOrderRequest {
            total_amount: self.cart.total_price(),
            user_id: self.user_id,
        })
    }

    /// Apply the result of an order submission and return to Idle.
    ///
    /// On success the cart is cleared and the cart panel closed. On failure
    /// the cart is left exactly as it was so the shopper can retry.
    pub fn complete_checkout(
        &mut self,
        result: Result<OrderConfirmation, OrderSubmitError>,
    ) -> CheckoutOutcome {
        self.checkout = CheckoutPhase::Idle;

        match result {
            Ok(confirmation) => {
                info!(order_id = %confirmation.order_id, "Order placed");
                self.cart.clear_cart();
                self.is_cart_open = false;
                CheckoutOutcome::Placed {
                    order_id: confirmation.order_id,
                }
            }
            Err(e) => {
                error!(error = %e, "Order submission failed");
                CheckoutOutcome::Failed(e)
            }
        }
    }

    /// Submit the cart as an order.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if checkout is refused; no request is made
    /// in that case. A failed submission is not an error here: it is reported
    /// as [`CheckoutOutcome::Failed`].
    #[instrument(skip(self), fields(items = self.cart.total_items()))]
    pub async fn checkout(&mut self) -> Result<CheckoutOutcome, CheckoutError> {
        let request = self.begin_checkout()?;
        let result = self
            .api
            .create_order(&request)
            .await
            .map_err(OrderSubmitError);
        Ok(self.complete_checkout(result))
    }
}
