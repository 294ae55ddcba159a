//! Catalog browsing over HTTP: listing filters, detail pages and the JSON API.

use elite_store_integration_tests::{TestServer, decimal};
use reqwest::StatusCode;
use rust_decimal::Decimal;

fn ids(listing: &serde_json::Value) -> Vec<i64> {
    listing["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_home_page() {
    let server = TestServer::spawn().await;

    let resp = server.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.headers()["x-frame-options"], "DENY");

    let body = resp.text().await.unwrap();
    assert!(body.contains("Shop by Category"));
    assert!(body.contains("Featured Products"));
    assert!(body.contains("/products?category=Electronics"));
}

#[tokio::test]
async fn test_listing_page() {
    let server = TestServer::spawn().await;

    let body = server.get_text("/products").await;
    assert!(body.contains("Showing 12 of 12 products"));

    let body = server.get_text("/products?category=Beauty").await;
    assert!(body.contains("Showing 3 of 12 products"));

    let body = server.get_text("/products?search=zzzz").await;
    assert!(body.contains("No products found"));
}

#[tokio::test]
async fn test_product_detail() {
    let server = TestServer::spawn().await;

    let resp = server.get("/products/1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Wireless Noise-Cancelling Headphones"));
    assert!(body.contains("Midnight Blue"));
    assert!(body.contains("You save $100.00"));
    // No shipped photos, so the gallery falls back to the placeholder
    assert!(body.contains("image-placeholder"));
    assert!(!body.contains("/static/images/"));

    let resp = server.get("/products/999").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = TestServer::spawn().await;

    let resp = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "trace-abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "trace-abc-123");
}

// ============================================================================
// JSON listing
// ============================================================================

#[tokio::test]
async fn test_api_listing_unfiltered() {
    let server = TestServer::spawn().await;

    let listing = server.get_json("/api/products").await;
    assert_eq!(listing["total"], 12);
    assert_eq!(listing["count"], 12);
    assert_eq!(listing["query"], "");

    // Featured sort puts featured products first
    let products = listing["products"].as_array().unwrap();
    let first_plain = products
        .iter()
        .position(|p| p["featured"] != true)
        .unwrap();
    assert!(products[first_plain..].iter().all(|p| p["featured"] != true));
}

#[tokio::test]
async fn test_api_listing_category_and_price_sort() {
    let server = TestServer::spawn().await;

    let listing = server
        .get_json("/api/products?category=Fashion&sort=price-low")
        .await;
    let products = listing["products"].as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert!(products.iter().all(|p| p["category"] == "Fashion"));

    let prices: Vec<_> = products.iter().map(|p| decimal(&p["price"])).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));

    let descending = server
        .get_json("/api/products?category=Fashion&sort=price-high")
        .await;
    let mut reversed = ids(&descending);
    reversed.reverse();
    assert_eq!(ids(&listing), reversed);
}

#[tokio::test]
async fn test_api_listing_price_range_and_featured() {
    let server = TestServer::spawn().await;

    let listing = server
        .get_json("/api/products?min_price=50&max_price=200&featured=true")
        .await;
    for product in listing["products"].as_array().unwrap() {
        let price = decimal(&product["price"]);
        assert!(price >= Decimal::from(50) && price <= Decimal::from(200));
        assert_eq!(product["featured"], true);
    }
    assert!(listing["count"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_api_listing_malformed_params_are_ignored() {
    let server = TestServer::spawn().await;

    let listing = server
        .get_json("/api/products?min_price=abc&sort=bogus&category=Toys&featured=perhaps")
        .await;
    assert_eq!(listing["count"], listing["total"]);
    assert_eq!(listing["query"], "");
}

#[tokio::test]
async fn test_api_listing_query_round_trip() {
    let server = TestServer::spawn().await;

    let listing = server
        .get_json("/api/products?sort=rating&search=Black&category=Electronics,Fashion")
        .await;
    let query = listing["query"].as_str().unwrap().to_string();
    assert_eq!(
        query,
        "search=Black&category=Electronics&category=Fashion&sort=rating"
    );

    let again = server.get_json(&format!("/api/products?{query}")).await;
    assert_eq!(ids(&again), ids(&listing));
    assert_eq!(again["query"], listing["query"]);
}

#[tokio::test]
async fn test_placeholder_image_bounds() {
    let server = TestServer::spawn().await;

    let resp = server.get("/api/placeholder/400/300").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("viewBox=\"0 0 400 300\""));

    let resp = server.get("/api/placeholder/0/40").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server.get("/api/placeholder/5000/40").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
