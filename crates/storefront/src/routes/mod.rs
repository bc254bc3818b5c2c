//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Storefront page
//! GET  /health                 - Health check
//! GET  /overlays               - Cart panel, checkout, details (fragment)
//!
//! # Cart (HTMX fragments)
//! POST /cart/add               - Add to cart (product_id, size)
//! POST /cart/update            - Set quantity (product_id, size, quantity)
//! POST /cart/remove            - Remove line (product_id, size)
//! POST /cart/open              - Open cart panel
//! POST /cart/close             - Close cart panel
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Close cart, open checkout view
//! POST /checkout/close         - Close checkout view
//!
//! # Product details
//! POST /products/{id}/select   - Open details overlay
//! POST /products/deselect      - Close details overlay
//!
//! # JSON
//! GET  /api/session            - Session snapshot
//! GET  /api/catalog            - Catalog products
//! ```
//!
//! Mutations answer HTMX requests with the overlays fragment and an
//! `HX-Trigger` header; plain form posts are redirected back to `/`.

pub mod api;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::htmx::{HX_TRIGGER, is_htmx_request, trigger_header};
use crate::models::SessionCart;
use crate::state::AppState;
use crate::views::OverlaysView;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::checkout))
        .route("/close", post(checkout::close))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/select", post(products::select))
        .route("/deselect", post(products::deselect))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(api::session_state))
        .route("/catalog", get(api::catalog))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/overlays", get(home::overlays))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/products", product_routes())
        .nest("/api", api_routes())
}

/// Save the visitor's cart and answer a mutation.
///
/// HTMX requests get the overlays fragment and an `HX-Trigger` header listing
/// the changed aspects. Plain form posts are sent back to the page.
pub(crate) fn respond(
    state: &AppState,
    headers: &HeaderMap,
    cart: SessionCart,
) -> Response {
    let (snapshot, change) = cart.save();

    if !is_htmx_request(headers) {
        return Redirect::to("/").into_response();
    }

    let fragment = home::OverlaysTemplate {
        overlays: OverlaysView::new(&snapshot, state.catalog()),
    };

    match trigger_header(change) {
        Some(events) => (AppendHeaders([(HX_TRIGGER, events)]), fragment).into_response(),
        None => fragment.into_response(),
    }
}
