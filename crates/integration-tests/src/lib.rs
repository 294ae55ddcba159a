//! Integration tests for the EliteStore storefront.
//!
//! Each test spawns the real router on an ephemeral port and drives it over
//! HTTP with a cookie-keeping client, so the session cookie carries the cart
//! and the signed-in profile between requests exactly as in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p elite-store-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - add, count, update, remove and order totals
//! - `auth_flow` - login, account, logout and registration
//! - `products` - listing filters, detail pages and the JSON API

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use elite_store_core::Catalog;
use elite_store_storefront::{AppState, StorefrontConfig, build_app};
use reqwest::{Client, Response, redirect};
use rust_decimal::Decimal;

/// A storefront running on a random local port.
pub struct TestServer {
    addr: SocketAddr,
    /// Browser-like client: keeps cookies, does not follow redirects.
    pub client: Client,
}

impl TestServer {
    /// Start a storefront over the bundled catalog.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot start.
    pub async fn spawn() -> Self {
        Self::with_catalog(Catalog::bundled().expect("bundled catalog is valid")).await
    }

    /// Start a storefront over `catalog`, with no simulated auth latency.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot start.
    pub async fn with_catalog(catalog: Catalog) -> Self {
        let config = StorefrontConfig {
            auth_latency: Duration::ZERO,
            ..StorefrontConfig::default()
        };
        let app = build_app(AppState::with_catalog(config, catalog));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has an address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            addr,
            client: new_client(),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// GET `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// GET `path` and return the body text.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not text.
    pub async fn get_text(&self, path: &str) -> String {
        self.get(path).await.text().await.expect("Failed to read body")
    }

    /// GET `path` and parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        self.get(path).await.json().await.expect("Failed to parse JSON")
    }

    /// A second visitor: same server, separate cookie jar.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            addr: self.addr,
            client: new_client(),
        }
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The `Location` header of a redirect.
///
/// # Panics
///
/// Panics if the response has no `Location` header.
#[must_use]
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("Response has no Location header")
}

/// Read a decimal that was serialized as a JSON string.
///
/// # Panics
///
/// Panics if `value` is not a decimal string.
#[must_use]
pub fn decimal(value: &serde_json::Value) -> Decimal {
    value
        .as_str()
        .and_then(|s| Decimal::from_str(s).ok())
        .unwrap_or_else(|| panic!("expected a decimal string, got {value}"))
}
