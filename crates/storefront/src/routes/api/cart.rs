//! Cart API.

use axum::{Json, extract::State};
use elite_store_core::{CartItem, OrderSummary};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::services::cart::load_cart;
use crate::state::AppState;

/// The visitor's cart with derived totals.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub summary: OrderSummary,
}

/// Return the visitor's cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartResponse>> {
    let store = load_cart(&session).await?;
    let cart = store.cart();

    Ok(Json(CartResponse {
        summary: cart.summary(&state.config().pricing),
        items: cart.items().to_vec(),
    }))
}
