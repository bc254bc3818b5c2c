//! Cart line items.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId, Size};

/// The identity of a cart line: one product in one size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartKey {
    pub product_id: ProductId,
    pub size: Size,
}

impl CartKey {
    #[must_use]
    pub const fn new(product_id: ProductId, size: Size) -> Self {
        Self { product_id, size }
    }
}

/// A product in a chosen size with a positive quantity.
///
/// The product is copied out of the catalog when the item is created so the
/// cart can render without going back to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub size: Size,
    quantity: NonZeroU32,
}

impl CartItem {
    /// A new line with quantity 1.
    #[must_use]
    pub fn new(product: Product, size: Size) -> Self {
        Self {
            product,
            size,
            quantity: NonZeroU32::MIN,
        }
    }

    /// A line with an explicit quantity.
    #[must_use]
    pub const fn with_quantity(product: Product, size: Size, quantity: NonZeroU32) -> Self {
        Self {
            product,
            size,
            quantity,
        }
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    pub(crate) const fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    pub(crate) const fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    #[must_use]
    pub fn key(&self) -> CartKey {
        CartKey::new(self.product.id.clone(), self.size)
    }

    /// Whether this line is keyed by `(product_id, size)`.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: Size) -> bool {
        self.size == size && &self.product.id == product_id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity())
    }
}
