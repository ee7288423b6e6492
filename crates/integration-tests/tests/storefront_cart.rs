//! Integration tests for the storefront cart.
//!
//! Each test drives the router in-process and keeps the session cookie
//! between requests, like a single browser tab.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::StatusCode;
use futures::StreamExt;
use shopease_integration_tests::TestClient;
use shopease_storefront::config::StorefrontConfig;
use shopease_storefront::state::AppState;

async fn add(
    client: &mut TestClient,
    id: &str,
    name: &str,
    price: &str,
    quantity: &str,
) -> shopease_integration_tests::TestResponse {
    client
        .post_form(
            "/cart/add",
            &[
                ("id", id),
                ("name", name),
                ("price", price),
                ("quantity", quantity),
            ],
        )
        .await
}

async fn badge(client: &mut TestClient) -> String {
    client.get("/cart/count").await.body.trim().to_string()
}

// =============================================================================
// Basics
// =============================================================================

#[tokio::test]
async fn test_health() {
    let mut client = TestClient::new();
    let resp = client.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
}

#[tokio::test]
async fn test_fresh_session_is_empty() {
    let mut client = TestClient::new();

    let page = client.get("/cart").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Your cart is empty."));
    assert_eq!(badge(&mut client).await, "0");
}

#[tokio::test]
async fn test_home_lists_catalog() {
    let mut client = TestClient::new();
    let page = client.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Wireless Mouse"));
    assert!(page.body.contains("hx-post=\"/cart/add\""));
}

// =============================================================================
// Cart Lifecycle
// =============================================================================

#[tokio::test]
async fn test_widget_lifecycle() {
    let mut client = TestClient::new();

    let resp = add(&mut client, "p1", "Widget", "1000", "3").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert_eq!(resp.body.trim(), "3");
    assert!(client.cookie().is_some());

    let page = client.get("/cart").await;
    assert!(page.body.contains("Widget"));
    assert!(page.body.contains("<dd id=\"cart-subtotal\">₱3,000</dd>"));
    assert!(page.body.contains("<dd id=\"cart-shipping\">FREE</dd>"));
    assert!(page.body.contains("<dd id=\"cart-total\">₱3,000</dd>"));

    // Quantity below one clamps to one
    let resp = client
        .post_form("/cart/update", &[("id", "p1"), ("quantity", "0")])
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert!(resp.body.contains("value=\"1\""));
    assert!(resp.body.contains("<dd id=\"cart-subtotal\">₱1,000</dd>"));
    assert!(resp.body.contains("<dd id=\"cart-shipping\">₱150</dd>"));
    assert!(resp.body.contains("<dd id=\"cart-total\">₱1,150</dd>"));
    assert_eq!(badge(&mut client).await, "1");

    let resp = client.post_form("/cart/remove", &[("id", "p1")]).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Your cart is empty."));
    assert!(resp.body.contains("<dd id=\"cart-total\">₱0</dd>"));
    assert_eq!(badge(&mut client).await, "0");
}

#[tokio::test]
async fn test_adding_same_product_merges() {
    let mut client = TestClient::new();

    add(&mut client, "p1", "Widget", "1000", "2").await;
    let resp = add(&mut client, "p1", "Widget", "9999", "1").await;
    assert_eq!(resp.body.trim(), "3");

    let page = client.get("/cart").await;
    assert_eq!(page.body.matches("class=\"cart-item\"").count(), 1);
    assert!(page.body.contains("<dd id=\"cart-subtotal\">₱3,000</dd>"));
}

#[tokio::test]
async fn test_cart_keeps_insertion_order() {
    let mut client = TestClient::new();

    add(&mut client, "p2", "Cable", "500", "1").await;
    add(&mut client, "p1", "Mouse", "1000", "1").await;

    let page = client.get("/cart").await;
    let cable = page.body.find("Cable").unwrap();
    let mouse = page.body.find("Mouse").unwrap();
    assert!(cable < mouse);
}

#[tokio::test]
async fn test_missing_quantity_defaults_to_one() {
    let mut client = TestClient::new();
    let resp = client
        .post_form(
            "/cart/add",
            &[("id", "p2"), ("name", "Cable"), ("price", "500")],
        )
        .await;
    assert_eq!(resp.body.trim(), "1");
}

#[tokio::test]
async fn test_blank_name_falls_back_to_id() {
    let mut client = TestClient::new();
    add(&mut client, "sku-42", "", "100", "1").await;

    let page = client.get("/cart").await;
    assert!(page.body.contains("<h3>sku-42</h3>"));
}

#[tokio::test]
async fn test_update_unknown_product_is_noop() {
    let mut client = TestClient::new();
    add(&mut client, "p1", "Widget", "1000", "2").await;

    let resp = client
        .post_form("/cart/update", &[("id", "p9"), ("quantity", "5")])
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.header("hx-trigger").is_none());
    assert_eq!(badge(&mut client).await, "2");
}

#[tokio::test]
async fn test_bad_price_rejected() {
    let mut client = TestClient::new();
    let resp = add(&mut client, "p1", "Widget", "ten", "1").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(badge(&mut client).await, "0");
}

#[tokio::test]
async fn test_blank_id_rejected() {
    let mut client = TestClient::new();
    let resp = add(&mut client, "  ", "Widget", "1000", "1").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_cart_rejects_new_product() {
    let config = StorefrontConfig {
        cart: shopease_storefront::config::CartConfig {
            slot_capacity: 2,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut client = TestClient::with_state(AppState::new(config));

    add(&mut client, "p1", "Mouse", "1000", "1").await;
    add(&mut client, "p2", "Cable", "500", "1").await;
    let resp = add(&mut client, "p3", "Keyboard", "3500", "1").await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert!(resp.body.contains("up to 2 different products"));

    // Existing products can still grow
    let resp = add(&mut client, "p1", "Mouse", "1000", "4").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.trim(), "6");
}

// =============================================================================
// Sessions and Tabs
// =============================================================================

#[tokio::test]
async fn test_sessions_are_isolated() {
    let state = AppState::new(StorefrontConfig::default());
    let mut alice = TestClient::with_state(state.clone());
    let mut bob = TestClient::with_state(state);

    add(&mut alice, "p1", "Widget", "1000", "2").await;

    assert_eq!(badge(&mut alice).await, "2");
    assert_eq!(badge(&mut bob).await, "0");
}

#[tokio::test]
async fn test_tabs_share_cart() {
    let mut first = TestClient::new();
    add(&mut first, "p1", "Widget", "1000", "1").await;

    let mut second = first.new_tab();
    add(&mut second, "p2", "Cable", "500", "2").await;

    assert_eq!(badge(&mut first).await, "3");
}

#[tokio::test]
async fn test_badge_update_broadcast_to_session() {
    let state = AppState::new(StorefrontConfig::default());
    let mut rx = state.badges().subscribe();
    let mut client = TestClient::with_state(state);

    // The first write creates the session; later writes carry its id
    add(&mut client, "p1", "Widget", "1000", "1").await;
    add(&mut client, "p1", "Widget", "1000", "4").await;

    let update = rx.try_recv().unwrap();
    assert_eq!(update.count, 5);
    assert!(!update.session.is_empty());
}

#[tokio::test]
async fn test_events_stream_counts_from_other_tab() {
    let mut first = TestClient::new();
    add(&mut first, "p1", "Widget", "1000", "1").await;
    let mut second = first.new_tab();

    let (status, mut events) = first.open_stream("/cart/events").await;
    assert_eq!(status, StatusCode::OK);

    add(&mut second, "p2", "Cable", "500", "2").await;

    let mut received = String::new();
    while !received.contains("data: 3") {
        let chunk = tokio::time::timeout(Duration::from_secs(2), events.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        received.push_str(&String::from_utf8_lossy(&chunk));
    }
    assert!(received.contains("event: badge"));
}

#[tokio::test]
async fn test_events_without_session_is_event_stream() {
    let mut client = TestClient::new();
    let (status, _events) = client.open_stream("/cart/events").await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_summary() {
    let mut client = TestClient::new();
    add(&mut client, "p1", "Widget", "1000", "3").await;

    let page = client.get("/checkout").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Qty: 3"));
    assert!(page.body.contains("<dd id=\"checkout-total\">₱3,000</dd>"));
    assert!(page.body.contains("id=\"checkout-form\""));
}

#[tokio::test]
async fn test_invalid_checkout_keeps_cart() {
    let mut client = TestClient::new();
    add(&mut client, "p1", "Widget", "1000", "3").await;

    let mut fields = shopease_integration_tests::valid_checkout();
    fields.retain(|(name, _)| *name != "city");
    let resp = client.post_form("/checkout", &fields).await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.body.contains("Please fill in all required fields correctly."));
    assert!(resp.body.contains("value=\"Maria Santos\""));
    assert_eq!(badge(&mut client).await, "3");
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let mut client = TestClient::new();
    add(&mut client, "p1", "Widget", "1000", "1").await;

    let mut fields = shopease_integration_tests::valid_checkout();
    for field in &mut fields {
        if field.0 == "email" {
            field.1 = "not-an-email";
        }
    }
    let resp = client.post_form("/checkout", &fields).await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.body.contains("aria-invalid=\"true\""));
    assert_eq!(badge(&mut client).await, "1");
}

#[tokio::test]
async fn test_valid_checkout_clears_cart() {
    let mut client = TestClient::new();
    add(&mut client, "p1", "Widget", "1000", "3").await;

    let resp = client
        .post_form("/checkout", &shopease_integration_tests::valid_checkout())
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Order placed successfully!"));
    assert!(resp.body.contains("Your cart is empty."));
    assert!(resp.header("hx-trigger").is_none());
    assert_eq!(badge(&mut client).await, "0");

    let page = client.get("/cart").await;
    assert!(page.body.contains("Your cart is empty."));
}
