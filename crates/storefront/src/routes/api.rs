//! JSON read endpoints.

use axum::{Json, extract::State, response::IntoResponse};
use threadline_core::cart::SessionState;
use tower_sessions::Session;

use crate::models::current_state;
use crate::state::AppState;

/// The visitor's current session snapshot.
pub async fn session_state(
    State(state): State<AppState>,
    session: Session,
) -> Json<SessionState> {
    Json(current_state(&session, state.carts()).await)
}

/// Catalog products in display order.
pub async fn catalog(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog().products().to_vec())
}
