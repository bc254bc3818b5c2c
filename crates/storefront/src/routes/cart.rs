//! Cart route handlers.
//!
//! Cart operations use HTMX for in-page updates. Each handler applies one
//! store operation to the visitor's session and answers with the re-rendered
//! overlays plus an `HX-Trigger` naming what changed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use threadline_core::{ProductId, Size};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{SessionCart, current_state};
use crate::routes::respond;
use crate::state::AppState;

/// Identifies one cart line.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub product_id: ProductId,
    pub size: Size,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub size: Size,
    /// New quantity; zero or negative removes the line.
    pub quantity: i64,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Add one unit of a product in a size, opening the cart panel.
///
/// # Errors
///
/// Returns 404 for a product not in the catalog and 400 for a size the
/// product is not offered in.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .get(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    if !product.offers(form.size) {
        return Err(AppError::BadRequest(format!(
            "{} is not offered in size {}",
            product.name, form.size
        )));
    }

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product_id", product.id.as_str()),
            ("size", form.size.label()),
        ]),
    );

    let mut cart = SessionCart::load(&session, state.carts()).await?;
    cart.store_mut().add_to_cart(product, form.size);
    tracing::info!(
        product_id = %product.id,
        size = %form.size,
        units = cart.store().item_count(),
        "Added to cart"
    );

    Ok(respond(&state, &headers, cart))
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the visitor's session cannot be read or created.
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = SessionCart::load(&session, state.carts()).await?;
    cart.store_mut()
        .update_quantity(&form.product_id, form.size, form.quantity);

    Ok(respond(&state, &headers, cart))
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the visitor's session cannot be read or created.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    let mut cart = SessionCart::load(&session, state.carts()).await?;
    cart.store_mut().remove_item(&form.product_id, form.size);

    Ok(respond(&state, &headers, cart))
}

/// Open the cart panel.
///
/// # Errors
///
/// Returns an error if the visitor's session cannot be read or created.
#[instrument(skip(state, session, headers))]
pub async fn open(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let mut cart = SessionCart::load(&session, state.carts()).await?;
    cart.store_mut().open_cart();

    Ok(respond(&state, &headers, cart))
}

/// Close the cart panel.
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
    cart.store_mut().close_cart();

    Ok(respond(&state, &headers, cart))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: current_state(&session, state.carts()).await.item_count(),
    }
}
