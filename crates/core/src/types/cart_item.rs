//! Cart line item.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;
use crate::types::product::Product;

/// One product line in the cart.
///
/// A cart holds at most one item per `id`; adding the same product again
/// bumps `quantity` instead of creating a second line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image_url: String,
    pub quantity: u32,
}

impl CartItem {
    /// Start a new line for `product` with a quantity of one.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            image_url: product.image_url.clone(),
            quantity: 1,
        }
    }

    /// Price of the whole line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_product_starts_at_one() {
        let item = CartItem::from_product(&Product::placeholder());
        assert_eq!(item.quantity, 1);
        assert_eq!(item.id, ProductId::new(1));
        assert_eq!(item.unit_price, Price::from_major(100));
    }

    #[test]
    fn test_line_total() {
        let mut item = CartItem::from_product(&Product::placeholder());
        item.quantity = 3;
        assert_eq!(item.line_total(), Price::from_major(300));
    }
}
