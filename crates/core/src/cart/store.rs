//! The cart store: a snapshot of session state plus its subscribers.

use core::fmt;
use core::num::NonZeroU32;
use std::sync::Arc;

use super::item::{CartItem, CartKey};
use super::observer::{CartObserver, SubscriptionId};
use super::state::{SessionState, StateChange};
use crate::types::{Product, ProductId, Size};

/// In-memory session state for one visitor.
///
/// Every mutation builds a new [`SessionState`], diffs it against the current
/// one and, if anything changed, swaps it in and notifies observers. Callers
/// holding an earlier [`snapshot`](Self::snapshot) keep seeing the old state.
///
/// None of the operations can fail: lookups that match nothing are no-ops.
///
/// ```
/// use rust_decimal::Decimal;
/// use threadline_core::cart::CartStore;
/// use threadline_core::{CurrencyCode, Price, Product, ProductId, Size};
///
/// let shirt = Product {
///     id: ProductId::parse("shirt-1").unwrap(),
///     name: "Oxford Shirt".into(),
///     price: Price::new(Decimal::new(48, 0), CurrencyCode::USD),
///     image: String::new(),
///     description: String::new(),
///     category: String::new(),
///     sizes: vec![Size::M],
/// };
///
/// let mut store = CartStore::new();
/// store.add_to_cart(&shirt, Size::M);
/// store.add_to_cart(&shirt, Size::M);
/// assert_eq!(store.items()[0].quantity(), 2);
/// assert!(store.is_cart_open());
///
/// store.update_quantity(&shirt.id, Size::M, 0);
/// assert!(store.items().is_empty());
/// ```
#[derive(Default)]
pub struct CartStore {
    state: Arc<SessionState>,
    observers: Vec<(SubscriptionId, Arc<dyn CartObserver>)>,
    next_subscription: u64,
}

impl CartStore {
    /// An empty cart with every panel closed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a stored snapshot.
    ///
    /// Duplicate lines in `state` are merged so the store starts out with one
    /// line per `(product, size)`.
    #[must_use]
    pub fn from_snapshot(state: SessionState) -> Self {
        Self {
            state: Arc::new(state.normalized()),
            ..Self::default()
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<SessionState> {
        Arc::clone(&self.state)
    }

    /// Consume the store, returning the current snapshot.
    #[must_use]
    pub fn into_snapshot(self) -> SessionState {
        Arc::unwrap_or_clone(self.state)
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    #[must_use]
    pub fn find(&self, key: &CartKey) -> Option<&CartItem> {
        self.state.find(&key.product_id, key.size)
    }

    #[must_use]
    pub fn is_cart_open(&self) -> bool {
        self.state.cart_open
    }

    #[must_use]
    pub fn is_checkout_open(&self) -> bool {
        self.state.checkout_open
    }

    #[must_use]
    pub fn selected_product(&self) -> Option<&ProductId> {
        self.state.selected_product.as_ref()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    /// Register an observer for subsequent changes.
    pub fn subscribe(&mut self, observer: Arc<dyn CartObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Add one unit of `product` in `size` and open the cart panel.
    ///
    /// An existing line keeps its position; otherwise a new line is appended.
    pub fn add_to_cart(&mut self, product: &Product, size: Size) -> StateChange {
        self.apply(|state| {
            if let Some(item) = state
                .items
                .iter_mut()
                .find(|item| item.matches(&product.id, size))
            {
                item.increment();
            } else {
                state.items.push(CartItem::new(product.clone(), size));
            }
            state.cart_open = true;
        })
    }

    /// Set the quantity of a line. Zero or negative removes it.
    ///
    /// Quantities above `u32::MAX` saturate.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        size: Size,
        quantity: i64,
    ) -> StateChange {
        self.apply(|state| {
            let Some(position) = state
                .items
                .iter()
                .position(|item| item.matches(product_id, size))
            else {
                return;
            };

            let clamped =
                u32::try_from(quantity.clamp(0, i64::from(u32::MAX))).unwrap_or(u32::MAX);
            match NonZeroU32::new(clamped) {
                Some(quantity) => {
                    if let Some(item) = state.items.get_mut(position) {
                        item.set_quantity(quantity);
                    }
                }
                None => {
                    state.items.remove(position);
                }
            }
        })
    }

    /// Remove a line entirely.
    pub fn remove_item(&mut self, product_id: &ProductId, size: Size) -> StateChange {
        self.apply(|state| {
            state.items.retain(|item| !item.matches(product_id, size));
        })
    }

    /// Close the cart panel and open the checkout view. Items are untouched.
    pub fn checkout(&mut self) -> StateChange {
        self.apply(|state| {
            state.cart_open = false;
            state.checkout_open = true;
        })
    }

    /// Show or hide the details overlay for a product.
    pub fn select_product(&mut self, product_id: Option<ProductId>) -> StateChange {
        self.apply(|state| state.selected_product = product_id)
    }

    pub fn open_cart(&mut self) -> StateChange {
        self.apply(|state| state.cart_open = true)
    }

    pub fn close_cart(&mut self) -> StateChange {
        self.apply(|state| state.cart_open = false)
    }

    pub fn close_checkout(&mut self) -> StateChange {
        self.apply(|state| state.checkout_open = false)
    }

    fn apply(&mut self, mutate: impl FnOnce(&mut SessionState)) -> StateChange {
        let mut next = SessionState::clone(&self.state);
        mutate(&mut next);

        let change = StateChange::between(&self.state, &next);
        if change.is_empty() {
            return change;
        }

        self.state = Arc::new(next);
        for (_, observer) in &self.observers {
            observer.on_change(&self.state, change);
        }
        change
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
