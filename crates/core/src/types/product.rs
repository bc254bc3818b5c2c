//! Catalog product records.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, Size};

/// A catalog entry.
///
/// Products are owned by the catalog and never mutated once loaded. The cart
/// keeps its own copy inside each [`CartItem`](crate::cart::CartItem).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL or path under `/static`.
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Sizes this product is offered in.
    pub sizes: Vec<Size>,
}

impl Product {
    /// Whether the product is offered in `size`.
    #[must_use]
    pub fn offers(&self, size: Size) -> bool {
        self.sizes.contains(&size)
    }
}
