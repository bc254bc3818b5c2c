//! HTMX request detection and client-side refresh events.
//!
//! Views in the browser listen for `HX-Trigger` events and re-fetch the
//! fragments they render. [`ViewRefresh`] subscribes to a cart store and turns
//! the changes it reports into those event names.

use std::sync::Mutex;

use axum::http::HeaderMap;
use threadline_core::cart::{Aspect, CartObserver, SessionState, StateChange};

/// Request header HTMX sets on every request it issues.
pub const HX_REQUEST: &str = "hx-request";

/// Response header that fires client-side events.
pub const HX_TRIGGER: &str = "HX-Trigger";

/// Whether the request came from HTMX rather than a plain form post.
#[must_use]
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

/// Client-side event fired when an aspect of the session changes.
#[must_use]
pub const fn event_name(aspect: Aspect) -> &'static str {
    match aspect {
        Aspect::Items => "cart-updated",
        Aspect::CartVisibility => "cart-toggled",
        Aspect::CheckoutVisibility => "checkout-toggled",
        Aspect::Selection => "selection-changed",
    }
}

/// `HX-Trigger` header value for a change, or `None` when nothing changed.
#[must_use]
pub fn trigger_header(change: StateChange) -> Option<String> {
    if change.is_empty() {
        return None;
    }
    Some(
        change
            .aspects()
            .map(event_name)
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Accumulates the changes a store reports during one request.
#[derive(Debug, Default)]
pub struct ViewRefresh {
    pending: Mutex<StateChange>,
}

impl ViewRefresh {
    /// Everything changed since the last call, resetting the accumulator.
    pub fn take(&self) -> StateChange {
        self.pending
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }
}

impl CartObserver for ViewRefresh {
    fn on_change(&self, _snapshot: &SessionState, change: StateChange) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = pending.merge(change);
        }
    }
}
