//! Catalog filtering.
//!
//! Filtering is a pair of predicates over the in-memory product list: a
//! case-insensitive name search and an exact category match.

use std::fmt;
use std::str::FromStr;

use poom_store_core::Product;

/// Categories offered to the shopper, in display order (`All` first).
pub const CATEGORIES: &[&str] = &["Monitor", "Gaming Gear", "Gadget", "Furniture", "Accessories"];

/// Catalog substituted when the product endpoint cannot be reached.
#[must_use]
pub fn placeholder_catalog() -> Vec<Product> {
    vec![Product::placeholder()]
}

/// Category selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Whether `category` passes this selection.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category,
        }
    }

    /// Every selection offered to the shopper.
    #[must_use]
    pub fn offered() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(CATEGORIES.iter().map(|c| Self::Named((*c).to_string())))
            .collect()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    /// Parse a selection; `all` (any case) or an empty string selects every
    /// category, anything else is taken literally.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Named(s.to_string()))
        }
    }
}

/// Search and category filter applied to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search_query: String,
    pub category: CategoryFilter,
}

impl ProductFilter {
    /// Whether `product` is visible under this filter.
    ///
    /// The query is used exactly as typed: whitespace is significant and an
    /// empty query matches every name.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = product
            .name
            .to_lowercase()
            .contains(&self.search_query.to_lowercase());
        matches_search && self.category.matches(&product.category)
    }

    /// Visible products, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}
