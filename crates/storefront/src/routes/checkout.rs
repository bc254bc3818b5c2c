//! Checkout view handlers.
//!
//! Checkout is a read-only summary of the cart. Opening it closes the cart
//! panel; the cart contents are left as they are.

use axum::{extract::State, http::HeaderMap, response::Response};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::models::SessionCart;
use crate::routes::respond;
use crate::state::AppState;

/// Move from the cart panel to the checkout view.
///
/// # Errors
///
/// Returns an error if the visitor's session cannot be read or created.
#[instrument(skip(state, session, headers))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let mut cart = SessionCart::load(&session, state.carts()).await?;
    cart.store_mut().checkout();

    add_breadcrumb("checkout", "Opened checkout", None);
    tracing::info!(
        lines = cart.store().items().len(),
        units = cart.store().item_count(),
        "Checkout opened"
    );

    Ok(respond(&state, &headers, cart))
}

/// Close the checkout view.
///
/// # Errors
///
/// Returns an error if the visitor's session cannot be read or created.
#[instrument(skip(state, session, headers))]
pub async fn close(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let mut cart = SessionCart::load(&session, state.carts()).await?;
    cart.store_mut().close_checkout();

    Ok(respond(&state, &headers, cart))
}
