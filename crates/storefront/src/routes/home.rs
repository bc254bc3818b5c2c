//! Home page and overlay fragment handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::current_state;
use crate::state::AppState;
use crate::views::{OverlaysView, ProductView};

/// Full storefront page: header, banner, product panels, overlays, footer.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
    pub overlays: OverlaysView,
    pub cart_count: u64,
}

/// Cart panel, checkout view, and product details (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/overlays.html")]
pub struct OverlaysTemplate {
    pub overlays: OverlaysView,
}

/// Display the storefront.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let snapshot = current_state(&session, state.carts()).await;
    let catalog = state.catalog();

    HomeTemplate {
        products: catalog.products().iter().map(ProductView::from).collect(),
        overlays: OverlaysView::new(&snapshot, catalog),
        cart_count: snapshot.item_count(),
    }
}

/// Render the overlays for the current session.
#[instrument(skip(state, session))]
pub async fn overlays(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let snapshot = current_state(&session, state.carts()).await;

    OverlaysTemplate {
        overlays: OverlaysView::new(&snapshot, state.catalog()),
    }
}
