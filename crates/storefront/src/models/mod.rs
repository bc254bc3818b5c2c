//! Per-visitor models keyed by session.

pub mod session;

pub use session::{CartRegistry, SessionCart, current_state, keys as session_keys};
