//! EliteStore storefront library.
//!
//! Server-rendered storefront over the `elite-store-core` domain: catalog
//! browsing with filters, a session cart and mock sign-in. Exposed as a
//! library so the binary and the integration tests build the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use app::build_app;
pub use config::StorefrontConfig;
pub use state::AppState;
