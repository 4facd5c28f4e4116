//! Integration tests for the storefront API.
//!
//! Products are created through the admin API and read back through the
//! storefront. Cart tests carry the session cookie between requests.

use axum::http::{Method, StatusCode};
use deskshop_integration_tests::{TestContext, json_request, request, send};
use serde_json::json;

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_list_categories() {
    let ctx = TestContext::new();

    let response = send(&ctx.storefront, request(Method::GET, "/categories", None)).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 5);
    assert_eq!(categories[0], json!({"name": "Pens", "slug": "pens"}));
    assert_eq!(categories[2]["slug"], "staplers-staples");
}

#[tokio::test]
async fn test_category_page_lists_its_products() {
    let ctx = TestContext::new();
    ctx.create_product("Blue Pen", 40).await;
    ctx.create_product("Red Pen", 12).await;

    let response = send(&ctx.storefront, request(Method::GET, "/categories/pens", None)).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["name"], "Pens");
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["title"], "Inkwell. Blue Pen");
    assert_eq!(products[0]["price"], "$12.50");
    assert_eq!(products[0]["discountedPrice"], "$11.25");

    let response = send(&ctx.storefront, request(Method::GET, "/categories/notebooks", None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["products"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_category_is_not_found() {
    let ctx = TestContext::new();

    let response = send(&ctx.storefront, request(Method::GET, "/categories/pencils", None)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_page() {
    let ctx = TestContext::new();
    let id = ctx.create_product("Blue Pen", 40).await;

    let response = send(
        &ctx.storefront,
        request(Method::GET, &format!("/products/{id}"), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["title"], "Inkwell. Blue Pen");
    assert_eq!(body["price"], "$12.50");
    assert_eq!(body["discountedPrice"], "$11.25");
    assert_eq!(body["discount"], "10%");
    assert_eq!(body["dimensions"], "W: 1cm, H: 14cm, D: 1cm");
    assert_eq!(body["weight"], "0.02 kg");
    assert_eq!(body["categorySlug"], "pens");
    assert_eq!(body["inCart"], 0);
    assert_eq!(body["addable"], 40);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let ctx = TestContext::new();

    let response = send(&ctx.storefront, request(Method::GET, "/products/missing", None)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_empty_cart() {
    let ctx = TestContext::new();

    let response = send(&ctx.storefront, request(Method::GET, "/cart", None)).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert!(body["lines"].as_array().unwrap().is_empty());
    assert_eq!(body["totalItems"], 0);
    assert_eq!(body["totalPrice"], "$0.00");
}

#[tokio::test]
async fn test_add_merges_lines_and_caps_at_stock() {
    let ctx = TestContext::new();
    let id = ctx.create_product("Blue Pen", 5).await;

    let response = send(
        &ctx.storefront,
        json_request("/cart/add", &json!({"productId": id, "quantity": 2}), None),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.session_cookie().unwrap();

    let response = send(
        &ctx.storefront,
        json_request("/cart/add", &json!({"productId": id, "quantity": 3}), Some(&cookie)),
    )
    .await;
    let body = response.json();
    assert_eq!(body["lines"].as_array().unwrap().len(), 1);
    assert_eq!(body["lines"][0]["quantity"], 5);
    assert_eq!(body["totalItems"], 5);
    assert_eq!(body["totalPrice"], "$62.50");

    let response = send(
        &ctx.storefront,
        json_request("/cart/add", &json!({"productId": id, "quantity": 4}), Some(&cookie)),
    )
    .await;
    let body = response.json();
    assert_eq!(body["lines"][0]["quantity"], 5);
    assert_eq!(body["lines"][0]["atStock"], true);

    let response = send(
        &ctx.storefront,
        request(Method::GET, &format!("/products/{id}"), Some(&cookie)),
    )
    .await;
    let body = response.json();
    assert_eq!(body["inCart"], 5);
    assert_eq!(body["addable"], 0);
}

#[tokio::test]
async fn test_increase_decrease_remove_and_clear() {
    let ctx = TestContext::new();
    let pen = ctx.create_product("Blue Pen", 3).await;
    let marker = ctx.create_product("Red Pen", 10).await;

    let response = send(
        &ctx.storefront,
        json_request("/cart/add", &json!({"productId": pen}), None),
    )
    .await;
    let cookie = response.session_cookie().unwrap();
    let cookie = Some(cookie.as_str());

    let line = json!({"productId": pen});
    for _ in 0..3 {
        send(&ctx.storefront, json_request("/cart/increase", &line, cookie)).await;
    }
    let response = send(&ctx.storefront, request(Method::GET, "/cart", cookie)).await;
    assert_eq!(response.json()["lines"][0]["quantity"], 3);

    for _ in 0..5 {
        send(&ctx.storefront, json_request("/cart/decrease", &line, cookie)).await;
    }
    let response = send(&ctx.storefront, request(Method::GET, "/cart", cookie)).await;
    assert_eq!(response.json()["lines"][0]["quantity"], 1);

    send(
        &ctx.storefront,
        json_request("/cart/add", &json!({"productId": marker, "quantity": 2}), cookie),
    )
    .await;
    let response = send(&ctx.storefront, json_request("/cart/remove", &line, cookie)).await;
    let body = response.json();
    assert_eq!(body["lines"].as_array().unwrap().len(), 1);
    assert_eq!(body["lines"][0]["id"], marker.as_str());
    assert_eq!(body["totalItems"], 2);

    let response = send(&ctx.storefront, request(Method::POST, "/cart/clear", cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let ctx = TestContext::new();
    let id = ctx.create_product("Blue Pen", 5).await;

    send(
        &ctx.storefront,
        json_request("/cart/add", &json!({"productId": id, "quantity": 2}), None),
    )
    .await;

    let response = send(&ctx.storefront, request(Method::GET, "/cart", None)).await;
    assert_eq!(response.json()["totalItems"], 0);
}

#[tokio::test]
async fn test_add_unknown_product() {
    let ctx = TestContext::new();

    let response = send(
        &ctx.storefront,
        json_request("/cart/add", &json!({"productId": "missing"}), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_zero_quantity_is_rejected() {
    let ctx = TestContext::new();
    let id = ctx.create_product("Blue Pen", 5).await;

    let response = send(
        &ctx.storefront,
        json_request("/cart/add", &json!({"productId": id, "quantity": 0}), None),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
