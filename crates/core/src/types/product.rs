//! Catalog product as served by the product API.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;

/// Image shown for products that have no image of their own.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/400x300?text=Poom+Store";

/// Rating shown for products the API did not rate.
const DEFAULT_RATING: f64 = 5.0;

/// A purchasable product from the catalog.
///
/// Products are read-only: the storefront never mutates them, it only copies
/// their fields into cart items. `id` and `price` are required; the remaining
/// fields tolerate being absent or `null` in the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    /// The single product shown when the catalog cannot be fetched.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            id: ProductId::new(1),
            name: "Test Product".to_string(),
            price: Price::from_major(100),
            rating: Some(DEFAULT_RATING),
            image_url: String::new(),
            category: "Monitor".to_string(),
        }
    }

    /// Image URL to display, falling back to a placeholder image.
    #[must_use]
    pub fn display_image_url(&self) -> &str {
        if self.image_url.is_empty() {
            PLACEHOLDER_IMAGE_URL
        } else {
            &self.image_url
        }
    }

    /// Rating to display. Missing, zero, and NaN ratings all count as
    /// unrated and show 5.0.
    #[must_use]
    pub fn display_rating(&self) -> f64 {
        self.rating
            .filter(|r| !r.is_nan() && *r != 0.0)
            .unwrap_or(DEFAULT_RATING)
    }
}
