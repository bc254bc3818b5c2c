//! Display data for templates.
//!
//! Everything here is derived from a session snapshot and the catalog on each
//! render. Totals are computed, never stored.

use threadline_core::cart::{CartItem, SessionState};
use threadline_core::{CurrencyCode, Price, Product};

use crate::catalog::Catalog;

/// Product display data for templates.
#[derive(Clone, Debug)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub description: String,
    pub category: String,
    pub sizes: Vec<&'static str>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            sizes: product.sizes.iter().map(|size| size.label()).collect(),
        }
    }
}

/// Cart line display data for templates.
#[derive(Clone, Debug)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub size: &'static str,
    pub quantity: u32,
    /// Quantity posted by the "-" button; zero removes the line.
    pub decrement: i64,
    /// Quantity posted by the "+" button.
    pub increment: i64,
    pub unit_price: String,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let quantity = item.quantity();
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            image: item.product.image.clone(),
            size: item.size.label(),
            quantity,
            decrement: i64::from(quantity) - 1,
            increment: i64::from(quantity) + 1,
            unit_price: item.product.price.display(),
            line_price: item.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone, Debug)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Price::zero(CurrencyCode::default()).display(),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&SessionState> for CartView {
    fn from(state: &SessionState) -> Self {
        if state.items.is_empty() {
            return Self::empty();
        }

        Self {
            items: state.items.iter().map(CartItemView::from).collect(),
            subtotal: subtotal(&state.items)
                .map_or_else(|| "Mixed currencies".to_string(), |price| price.display()),
            item_count: state.item_count(),
        }
    }
}

/// Sum of line totals, or `None` if lines are priced in different currencies.
fn subtotal(items: &[CartItem]) -> Option<Price> {
    let mut lines = items.iter().map(CartItem::line_total);
    let first = lines.next()?;
    lines.try_fold(first, Price::checked_add)
}

/// The cart panel, checkout view, and product details overlay.
#[derive(Clone, Debug)]
pub struct OverlaysView {
    pub cart: CartView,
    pub cart_open: bool,
    pub checkout_open: bool,
    /// Details for the selected product, if it is still in the catalog.
    pub selected: Option<ProductView>,
}

impl OverlaysView {
    #[must_use]
    pub fn new(state: &SessionState, catalog: &Catalog) -> Self {
        Self {
            cart: CartView::from(state),
            cart_open: state.cart_open,
            checkout_open: state.checkout_open,
            selected: state
                .selected_product
                .as_ref()
                .and_then(|id| catalog.get(id))
                .map(ProductView::from),
        }
    }
}
