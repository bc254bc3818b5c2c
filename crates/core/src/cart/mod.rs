//! Visitor session state: the cart and the storefront's panel flags.
//!
//! [`CartStore`] owns the current [`SessionState`] snapshot. Views read
//! snapshots and subscribe through [`CartObserver`] to re-render when a
//! mutation reports a [`StateChange`].

mod item;
mod observer;
mod state;
mod store;

pub use item::{CartItem, CartKey};
pub use observer::{CartObserver, SubscriptionId};
pub use state::{Aspect, SessionState, StateChange};
pub use store::CartStore;
