//! Cart store.
//!
//! The single source of truth for the shopper's in-progress order. Exactly
//! three mutators exist ([`CartStore::add_to_cart`],
//! [`CartStore::remove_from_cart`], [`CartStore::clear_cart`]); each one runs
//! to completion and then calls every subscriber, in registration order,
//! with the new item sequence before returning.
//!
//! Totals are derived on every read and never stored.

use std::fmt;

use poom_store_core::{CartItem, Price, Product, ProductId};
use tracing::debug;

use crate::error::cart_breadcrumb;

type Subscriber = Box<dyn Fn(&[CartItem]) + Send + Sync>;

/// Handle returned by [`CartStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered, de-duplicated cart with change notification.
#[derive(Default)]
pub struct CartStore {
    items: Vec<CartItem>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a callback invoked after every mutation.
    pub fn subscribe(
        &mut self,
        subscriber: impl Fn(&[CartItem]) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() < len_before
    }

    /// Record `action` for error reports, then notify subscribers.
    fn record(&self, action: &str, product_id: Option<ProductId>) {
        sentry::add_breadcrumb(cart_breadcrumb(action, product_id, self.total_items()));
        self.notify();
    }

    fn notify(&self) {
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.items);
        }
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Add one unit of `product`.
    ///
    /// Bumps the quantity of an existing line in place, or appends a new line
    /// with quantity one.
    pub fn add_to_cart(&mut self, product: &Product) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            debug!(product_id = %product.id, quantity = existing.quantity, "Incremented cart item");
        } else {
            self.items.push(CartItem::from_product(product));
            debug!(product_id = %product.id, "Added cart item");
        }

        self.record("Added to cart", Some(product.id));
    }

    /// Remove the whole line for `id`. Unknown ids leave the cart unchanged.
    pub fn remove_from_cart(&mut self, id: ProductId) {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != id);
        debug!(
            product_id = %id,
            removed = self.items.len() < len_before,
            "Removed cart item"
        );

        self.record("Removed from cart", Some(id));
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        debug!("Cleared cart");

        self.record("Cleared cart", None);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of `unit_price * quantity` across all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn product(id: i64, price: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_major(price),
            rating: None,
            image_url: format!("https://cdn.example.com/{id}.png"),
            category: "Gadget".to_string(),
        }
    }

    fn ids(store: &CartStore) -> Vec<i64> {
        store.items().iter().map(|i| i.id.as_i64()).collect()
    }

    #[test]
    fn test_add_new_product_appends_with_quantity_one() {
        let mut store = CartStore::new();
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(2, 50));

        assert_eq!(ids(&store), vec![1, 2]);
        let added = store.get(ProductId::new(2)).unwrap();
        assert_eq!(added.quantity, 1);
        assert_eq!(added.name, "Product 2");
        assert_eq!(added.image_url, "https://cdn.example.com/2.png");
    }

    #[test]
    fn test_add_existing_product_increments_in_place() {
        let mut store = CartStore::new();
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(2, 50));
        store.add_to_cart(&product(3, 10));
        let before = store.items().to_vec();

        store.add_to_cart(&product(2, 50));

        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert_eq!(store.get(ProductId::new(2)).unwrap().quantity, 2);
        assert_eq!(store.items()[0], before[0]);
        assert_eq!(store.items()[2], before[2]);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut store = CartStore::new();
        store.add_to_cart(&product(1, 100));
        let before = store.items().to_vec();

        store.remove_from_cart(ProductId::new(99));

        assert_eq!(store.items(), before.as_slice());
    }

    #[test]
    fn test_remove_drops_whole_line_and_keeps_order() {
        let mut store = CartStore::new();
        for id in 1..=4 {
            store.add_to_cart(&product(id, 10));
        }
        store.add_to_cart(&product(3, 10));

        store.remove_from_cart(ProductId::new(3));

        assert_eq!(ids(&store), vec![1, 2, 4]);
        assert!(store.get(ProductId::new(3)).is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = CartStore::new();
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(2, 50));

        store.clear_cart();
        assert!(store.is_empty());

        store.clear_cart();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_totals() {
        let mut store = CartStore::new();
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(2, 50));

        assert_eq!(store.total_items(), 3);
        assert_eq!(store.total_price(), Price::from_major(250));
    }

    #[test]
    fn test_totals_track_every_mutation() {
        let mut store = CartStore::new();
        assert_eq!(store.total_items(), 0);
        assert_eq!(store.total_price(), Price::ZERO);

        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(2, 50));
        store.add_to_cart(&product(2, 50));
        store.remove_from_cart(ProductId::new(1));
        assert_eq!(store.total_items(), 2);
        assert_eq!(store.total_price(), Price::from_major(100));

        store.clear_cart();
        store.add_to_cart(&product(3, 7));
        assert_eq!(store.total_items(), 1);
        assert_eq!(store.total_price(), Price::from_major(7));
    }

    #[test]
    fn test_subscribers_see_each_mutation() {
        let mut store = CartStore::new();
        let seen: Arc<Mutex<Vec<Vec<i64>>>> = Arc::default();
        let sink = Arc::clone(&seen);
        store.subscribe(move |items| {
            sink.lock()
                .unwrap()
                .push(items.iter().map(|i| i.id.as_i64()).collect());
        });

        store.add_to_cart(&product(1, 100));
        store.add_to_cart(&product(2, 50));
        store.remove_from_cart(ProductId::new(42));
        store.clear_cart();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![vec![1], vec![1, 2], vec![1, 2], vec![]]
        );
    }

    #[test]
    fn test_subscribers_called_in_registration_order() {
        let mut store = CartStore::new();
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::default();
        for name in ["first", "second"] {
            let sink = Arc::clone(&order);
            store.subscribe(move |_| sink.lock().unwrap().push(name));
        }

        store.clear_cart();

        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = CartStore::new();
        let calls: Arc<Mutex<u32>> = Arc::default();
        let sink = Arc::clone(&calls);
        let id = store.subscribe(move |_| *sink.lock().unwrap() += 1);

        store.add_to_cart(&product(1, 100));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add_to_cart(&product(1, 100));

        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
