//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing (search, category, sort,
//!                                min_price, max_price, featured)
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart page with order summary
//! POST /cart/add               - Add to cart, then redirect to return_to
//! POST /cart/update            - Set the quantity of one line
//! POST /cart/remove            - Remove every line of a product
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Profile overview
//!
//! # JSON API
//! GET  /api/products           - Filtered product listing
//! GET  /api/cart               - Cart lines and order summary
//! GET  /api/placeholder/{w}/{h} - Placeholder SVG (avatars)
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod cart;
pub mod home;
pub mod products;

use std::fmt::Display;
use std::str::FromStr;

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Deserializer};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(api::products::index))
        .route("/cart", get(api::cart::show))
        .route("/placeholder/{width}/{height}", get(api::placeholder::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/account", get(account::index))
        .nest("/auth", auth_routes())
        .nest("/api", api_routes())
}

/// Resolve a post-action redirect target.
///
/// Only same-site absolute paths are honored; anything else (missing,
/// protocol-relative, full URLs) falls back to `fallback`.
#[must_use]
pub fn safe_return_to<'a>(return_to: Option<&'a str>, fallback: &'a str) -> &'a str {
    match return_to.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => fallback,
    }
}

/// Deserialize an optional form value, treating an empty string as absent.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
