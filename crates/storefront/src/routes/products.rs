//! Product details overlay handlers.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use threadline_core::ProductId;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::SessionCart;
use crate::routes::respond;
use crate::state::AppState;

/// Show the details overlay for a product.
///
/// # Errors
///
/// Returns 400 for a malformed id and 404 for a product not in the catalog.
#[instrument(skip(state, session, headers))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = ProductId::parse(&id).map_err(|e| AppError::BadRequest(e.to_string()))?;
    if state.catalog().get(&id).is_none() {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    let mut cart = SessionCart::load(&session, state.carts()).await?;
    cart.store_mut().select_product(Some(id));

    Ok(respond(&state, &headers, cart))
}

/// Close the details overlay.
///
/// # Errors
///
/// Returns an error if the visitor's session cannot be read or created.
#[instrument(skip(state, session, headers))]
pub async fn deselect(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let mut cart = SessionCart::load(&session, state.carts()).await?;
    cart.store_mut().select_product(None);

    Ok(respond(&state, &headers, cart))
}
