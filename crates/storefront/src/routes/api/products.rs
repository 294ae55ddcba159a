//! Product listing API.

use axum::{
    Json,
    extract::{RawQuery, State},
};
use elite_store_core::Product;
use serde::Serialize;
use tracing::instrument;

use crate::routes::products::{filter_from_query, query_from_filter};
use crate::state::AppState;

/// Filtered product listing.
#[derive(Debug, Serialize)]
pub struct ProductListing {
    /// Products in the catalog.
    pub total: usize,
    /// Products that matched.
    pub count: usize,
    /// Canonical query string for this listing.
    pub query: String,
    pub products: Vec<Product>,
}

/// List products matching the query parameters of `/products`.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<ProductListing> {
    let catalog = state.catalog();
    let price_max = state.config().price_filter_max;
    let filter = filter_from_query(query.as_deref(), catalog, price_max);
    let products = filter.apply(catalog.products());

    let listing = ProductListing {
        total: catalog.len(),
        count: products.len(),
        query: query_from_filter(&filter, price_max),
        products: products.into_iter().cloned().collect(),
    };

    Json(listing)
}
