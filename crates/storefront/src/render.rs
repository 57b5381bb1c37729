//! Plain-text rendering of storefront state.

use std::io::{self, Write};

use poom_store_core::Product;

use crate::cart::CartStore;
use crate::catalog::CategoryFilter;
use crate::checkout::{CheckoutError, CheckoutOutcome};
use crate::view::{CatalogSource, Storefront};

/// Render the filtered product grid.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_catalog(out: &mut impl Write, storefront: &Storefront) -> io::Result<()> {
    if storefront.is_loading() {
        return writeln!(out, "Loading products...");
    }

    let visible = storefront.visible_products();
    match &storefront.filter().category {
        CategoryFilter::All => writeln!(out, "All products")?,
        CategoryFilter::Named(name) => writeln!(out, "Products in {name}")?,
    }
    writeln!(out, "Found {} products", visible.len())?;

    if visible.is_empty() {
        return writeln!(out, "No products match this search.");
    }

    for product in visible {
        write_product(out, product)?;
    }
    Ok(())
}

fn write_product(out: &mut impl Write, product: &Product) -> io::Result<()> {
    writeln!(
        out,
        "  [{id}] {name:<32} {price:>12}  ★{rating:.1}  {category}",
        id = product.id,
        name = product.name,
        price = product.price.to_string(),
        rating = product.display_rating(),
        category = product.category,
    )
}

/// Render the cart panel.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_cart(out: &mut impl Write, cart: &CartStore) -> io::Result<()> {
    writeln!(out, "Your cart")?;

    if cart.is_empty() {
        return writeln!(out, "  Your cart is empty.");
    }

    for item in cart.items() {
        writeln!(
            out,
            "  [{id}] {name:<32} {price:>12} x {quantity}",
            id = item.id,
            name = item.name,
            price = item.unit_price.to_string(),
            quantity = item.quantity,
        )?;
    }
    writeln!(
        out,
        "  Total: {} ({} items)",
        cart.total_price(),
        cart.total_items()
    )
}

/// Render the note shown under the grid when the catalog is fabricated.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_catalog_source(out: &mut impl Write, source: CatalogSource) -> io::Result<()> {
    match source {
        CatalogSource::Remote => Ok(()),
        CatalogSource::Placeholder => writeln!(
            out,
            "Could not reach the store; showing sample products."
        ),
    }
}

/// Render the alert shown after a checkout attempt.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_checkout_outcome(out: &mut impl Write, outcome: &CheckoutOutcome) -> io::Result<()> {
    match outcome {
        CheckoutOutcome::Placed { order_id } => {
            writeln!(out, "Order placed! Order ID: {order_id}")
        }
        CheckoutOutcome::Failed(_) => {
            writeln!(out, "Order failed. Your cart has been kept, please try again.")
        }
    }
}

/// Render a refused checkout.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_checkout_refused(out: &mut impl Write, err: CheckoutError) -> io::Result<()> {
    match err {
        CheckoutError::EmptyCart => writeln!(out, "Your cart is empty."),
        CheckoutError::InProgress => writeln!(out, "Your order is already being placed."),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use poom_store_core::{OrderId, Price, ProductId};

    use super::*;
    use crate::api::ApiError;
    use crate::error::OrderSubmitError;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_cart() {
        let text = render(|out| write_cart(out, &CartStore::new()));
        assert!(text.contains("Your cart is empty."));
    }

    #[test]
    fn test_cart_lines_and_total() {
        let mut cart = CartStore::new();
        let product = Product {
            id: ProductId::new(5),
            name: "Desk Lamp".to_string(),
            price: Price::from_major(1200),
            rating: None,
            image_url: String::new(),
            category: "Furniture".to_string(),
        };
        cart.add_to_cart(&product);
        cart.add_to_cart(&product);

        let text = render(|out| write_cart(out, &cart));

        assert!(text.contains("[5] Desk Lamp"));
        assert!(text.contains("฿1,200 x 2"));
        assert!(text.contains("Total: ฿2,400 (2 items)"));
    }

    #[test]
    fn test_outcome_messages() {
        let placed = CheckoutOutcome::Placed {
            order_id: OrderId::from(12),
        };
        assert_eq!(
            render(|out| write_checkout_outcome(out, &placed)),
            "Order placed! Order ID: 12\n"
        );

        let failed = CheckoutOutcome::Failed(OrderSubmitError(ApiError::Status {
            status: 502,
            body: String::new(),
        }));
        assert!(render(|out| write_checkout_outcome(out, &failed)).starts_with("Order failed."));
    }

    #[test]
    fn test_refusal_messages() {
        assert_eq!(
            render(|out| write_checkout_refused(out, CheckoutError::EmptyCart)),
            "Your cart is empty.\n"
        );
    }

    #[test]
    fn test_placeholder_source_note() {
        assert!(render(|out| write_catalog_source(out, CatalogSource::Remote)).is_empty());
        assert!(
            render(|out| write_catalog_source(out, CatalogSource::Placeholder))
                .contains("sample products")
        );
    }
}
