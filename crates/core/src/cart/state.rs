//! Session snapshots and the diff between two of them.

use serde::{Deserialize, Serialize};

use super::item::CartItem;
use crate::types::{ProductId, Size};

/// An immutable view of one visitor's session.
///
/// Items are kept in insertion order, which is also the display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub cart_open: bool,
    #[serde(default)]
    pub checkout_open: bool,
    /// The product whose details overlay is showing. Resolved through the
    /// catalog when rendering.
    #[serde(default)]
    pub selected_product: Option<ProductId>,
}

impl SessionState {
    /// The line keyed by `(product_id, size)`, if present.
    #[must_use]
    pub fn find(&self, product_id: &ProductId, size: Size) -> Option<&CartItem> {
        self.items.iter().find(|item| item.matches(product_id, size))
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merge duplicate keys into the first occurrence, summing quantities.
    ///
    /// Snapshots built by [`CartStore`](super::CartStore) never contain
    /// duplicates; this guards snapshots that arrive from storage.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let mut merged: Vec<CartItem> = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            if let Some(existing) = merged
                .iter_mut()
                .find(|existing| existing.matches(&item.product.id, item.size))
            {
                let quantity = existing.quantity().saturating_add(item.quantity());
                if let Some(quantity) = core::num::NonZeroU32::new(quantity) {
                    existing.set_quantity(quantity);
                }
            } else {
                merged.push(item);
            }
        }
        self.items = merged;
        self
    }
}

/// One observable part of a [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    /// Cart lines or their quantities.
    Items,
    /// Whether the cart panel is open.
    CartVisibility,
    /// Whether the checkout view is open.
    CheckoutVisibility,
    /// The product selected for the details overlay.
    Selection,
}

impl Aspect {
    const ALL: [Self; 4] = [
        Self::Items,
        Self::CartVisibility,
        Self::CheckoutVisibility,
        Self::Selection,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::Items => 1,
            Self::CartVisibility => 1 << 1,
            Self::CheckoutVisibility => 1 << 2,
            Self::Selection => 1 << 3,
        }
    }
}

/// The set of aspects that differ between two snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StateChange(u8);

impl StateChange {
    /// No change.
    pub const NONE: Self = Self(0);

    /// Compare two snapshots aspect by aspect.
    #[must_use]
    pub fn between(before: &SessionState, after: &SessionState) -> Self {
        let mut change = Self::NONE;
        if before.items != after.items {
            change = change.with(Aspect::Items);
        }
        if before.cart_open != after.cart_open {
            change = change.with(Aspect::CartVisibility);
        }
        if before.checkout_open != after.checkout_open {
            change = change.with(Aspect::CheckoutVisibility);
        }
        if before.selected_product != after.selected_product {
            change = change.with(Aspect::Selection);
        }
        change
    }

    #[must_use]
    pub const fn with(self, aspect: Aspect) -> Self {
        Self(self.0 | aspect.bit())
    }

    #[must_use]
    pub const fn contains(self, aspect: Aspect) -> bool {
        self.0 & aspect.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Union of two changes.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// The changed aspects in declaration order.
    pub fn aspects(self) -> impl Iterator<Item = Aspect> {
        Aspect::ALL
            .into_iter()
            .filter(move |aspect| self.contains(*aspect))
    }
}
