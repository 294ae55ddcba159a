//! Cart flow over HTTP: add, count, update, remove and order totals.

use elite_store_core::Catalog;
use elite_store_integration_tests::{TestServer, decimal, location};
use reqwest::StatusCode;
use rust_decimal::Decimal;

// ============================================================================
// Add / Count / Update / Remove
// ============================================================================

#[tokio::test]
async fn test_add_count_update_remove() {
    let server = TestServer::spawn().await;

    // Add 2 headphones in black
    let resp = server
        .post_form(
            "/cart/add",
            &[("product_id", "1"), ("color", "Black"), ("quantity", "2")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cart");

    // Adding the same variant again merges into the same line
    server
        .post_form("/cart/add", &[("product_id", "1"), ("color", "Black")])
        .await;

    let count = server.get_text("/cart/count").await;
    assert!(count.contains('3'), "count fragment: {count}");

    let cart = server.get_json("/api/cart").await;
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(items[0]["selected_color"], "Black");
    assert_eq!(cart["summary"]["item_count"], 3);

    // Set the quantity of that line
    let resp = server
        .post_form(
            "/cart/update",
            &[("product_id", "1"), ("color", "Black"), ("quantity", "5")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cart = server.get_json("/api/cart").await;
    assert_eq!(cart["items"][0]["quantity"], 5);

    // Zero removes the line
    server
        .post_form(
            "/cart/update",
            &[("product_id", "1"), ("color", "Black"), ("quantity", "0")],
        )
        .await;
    let cart = server.get_json("/api/cart").await;
    assert!(cart["items"].as_array().unwrap().is_empty());

    let page = server.get_text("/cart").await;
    assert!(page.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_remove_drops_every_variant_of_a_product() {
    let server = TestServer::spawn().await;

    for color in ["Black", "Silver"] {
        server
            .post_form("/cart/add", &[("product_id", "1"), ("color", color)])
            .await;
    }
    server.post_form("/cart/add", &[("product_id", "3")]).await;

    let cart = server.get_json("/api/cart").await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 3);

    let resp = server.post_form("/cart/remove", &[("product_id", "1")]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let cart = server.get_json("/api/cart").await;
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product"]["id"], 3);
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let server = TestServer::spawn().await;
    let other = server.new_visitor();

    server.post_form("/cart/add", &[("product_id", "5")]).await;

    let cart = other.get_json("/api/cart").await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

// ============================================================================
// Rejections
// ============================================================================

#[tokio::test]
async fn test_add_rejections() {
    let server = TestServer::spawn().await;

    let resp = server.post_form("/cart/add", &[("product_id", "999")]).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Product 6 is out of stock
    let resp = server.post_form("/cart/add", &[("product_id", "6")]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server
        .post_form("/cart/add", &[("product_id", "1"), ("color", "Plaid")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = server
        .post_form("/cart/add", &[("product_id", "1"), ("quantity", "0")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let cart = server.get_json("/api/cart").await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_of_missing_line_is_not_found() {
    let server = TestServer::spawn().await;

    let resp = server
        .post_form("/cart/update", &[("product_id", "1"), ("quantity", "2")])
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_redirects_only_to_local_paths() {
    let server = TestServer::spawn().await;

    let resp = server
        .post_form(
            "/cart/add",
            &[("product_id", "5"), ("return_to", "/products?sort=rating")],
        )
        .await;
    assert_eq!(location(&resp), "/products?sort=rating");

    let resp = server
        .post_form(
            "/cart/add",
            &[("product_id", "5"), ("return_to", "//evil.example.com")],
        )
        .await;
    assert_eq!(location(&resp), "/cart");

    // The flash shows once on the next page
    let page = server.get_text("/").await;
    assert!(page.contains("Added to cart"));
    let page = server.get_text("/").await;
    assert!(!page.contains("Added to cart"));
}

// ============================================================================
// Totals
// ============================================================================

#[tokio::test]
async fn test_order_summary_totals() {
    let catalog = Catalog::from_json(
        r#"{
            "categories": [{ "name": "Goods" }],
            "products": [{
                "id": 1, "name": "Fifty", "description": "Costs fifty",
                "price": "50.00", "category": "Goods",
                "rating": 4.0, "review_count": 1, "in_stock": true
            }]
        }"#,
    )
    .unwrap();
    let server = TestServer::with_catalog(catalog).await;

    server
        .post_form("/cart/add", &[("product_id", "1"), ("quantity", "2")])
        .await;

    let summary = server.get_json("/api/cart").await["summary"].clone();
    assert_eq!(decimal(&summary["subtotal"]), Decimal::new(100, 0));
    assert_eq!(decimal(&summary["tax"]), Decimal::new(8, 0));
    assert_eq!(decimal(&summary["shipping"]), Decimal::ZERO);
    assert_eq!(decimal(&summary["total"]), Decimal::new(108, 0));

    let page = server.get_text("/cart").await;
    assert!(page.contains("$108.00"));
    assert!(page.contains("FREE"));
}

#[tokio::test]
async fn test_small_orders_pay_shipping() {
    let server = TestServer::spawn().await;

    // One $29.99 t-shirt
    server.post_form("/cart/add", &[("product_id", "5")]).await;

    let summary = server.get_json("/api/cart").await["summary"].clone();
    assert_eq!(decimal(&summary["shipping"]), Decimal::new(999, 2));
    assert_eq!(
        decimal(&summary["free_shipping_remaining"]),
        Decimal::new(6901, 2)
    );

    let page = server.get_text("/cart").await;
    assert!(page.contains("Add $69.01 more for free shipping!"));
}
