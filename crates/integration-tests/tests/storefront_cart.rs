//! Integration tests for the cart flow over HTTP.
//!
//! Every request goes through the full router: session layer, handlers,
//! templates, and the cart store underneath.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use threadline_core::cart::CartStore;
use threadline_core::{ProductId, Size};
use threadline_integration_tests::TestApp;
use threadline_storefront::catalog::Catalog;

fn pid(id: &str) -> ProductId {
    ProductId::parse(id).unwrap()
}

// =============================================================================
// Add / Update / Remove
// =============================================================================

#[tokio::test]
async fn test_add_to_empty_cart_opens_panel() {
    let mut app = TestApp::new();

    let response = app
        .htmx_post("/cart/add", "product_id=shirt-1&size=M")
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let state = app.session_state().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].product.id, pid("shirt-1"));
    assert_eq!(state.items[0].size, Size::M);
    assert_eq!(state.items[0].quantity(), 1);
    assert!(state.cart_open);
    assert!(!state.checkout_open);
}

#[tokio::test]
async fn test_full_shopping_flow() {
    let mut app = TestApp::new();

    app.htmx_post("/cart/add", "product_id=shirt-1&size=M").await;
    app.htmx_post("/cart/add", "product_id=shirt-1&size=M").await;
    app.htmx_post("/cart/add", "product_id=shirt-1&size=L").await;

    let state = app.session_state().await;
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[0].size, Size::M);
    assert_eq!(state.items[0].quantity(), 2);
    assert_eq!(state.items[1].size, Size::L);
    assert_eq!(state.items[1].quantity(), 1);

    app.htmx_post("/cart/update", "product_id=shirt-1&size=M&quantity=5")
        .await;
    app.htmx_post("/cart/remove", "product_id=shirt-1&size=L").await;

    let state = app.session_state().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].quantity(), 5);

    let response = app.htmx_post("/checkout", "").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("$340.00"));
    assert!(response.body.contains("5 items"));

    let state = app.session_state().await;
    assert!(!state.cart_open);
    assert!(state.checkout_open);
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].quantity(), 5);
}

#[tokio::test]
async fn test_http_scenario_matches_store_scenario() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "product_id=shirt-1&size=M").await;
    app.htmx_post("/cart/add", "product_id=shirt-1&size=M").await;
    app.htmx_post("/cart/update", "product_id=shirt-1&size=M&quantity=0")
        .await;
    app.htmx_post("/checkout", "").await;
    let over_http = app.session_state().await;

    let catalog = Catalog::bundled().unwrap();
    let shirt = catalog.get(&pid("shirt-1")).unwrap();
    let mut store = CartStore::new();
    store.add_to_cart(shirt, Size::M);
    store.add_to_cart(shirt, Size::M);
    store.update_quantity(&shirt.id, Size::M, 0);
    store.checkout();

    assert_eq!(over_http, store.into_snapshot());
    assert!(over_http.items.is_empty());
    assert!(!over_http.cart_open);
    assert!(over_http.checkout_open);
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "product_id=tee-1&size=S").await;
    app.htmx_post("/cart/add", "product_id=crew-1&size=L").await;

    app.htmx_post("/cart/update", "product_id=tee-1&size=S&quantity=0")
        .await;

    let state = app.session_state().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].product.id, pid("crew-1"));
}

#[tokio::test]
async fn test_update_negative_removes_line() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "product_id=tee-1&size=S").await;

    app.htmx_post("/cart/update", "product_id=tee-1&size=S&quantity=-3")
        .await;

    assert!(app.session_state().await.items.is_empty());
}

#[tokio::test]
async fn test_update_missing_line_is_a_no_op() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "product_id=tee-1&size=S").await;

    let response = app
        .htmx_post("/cart/update", "product_id=tee-1&size=XL&quantity=4")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("hx-trigger").is_none());

    let state = app.session_state().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].size, Size::S);
}

#[tokio::test]
async fn test_remove_preserves_order_of_remaining_lines() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "product_id=tee-1&size=S").await;
    app.htmx_post("/cart/add", "product_id=crew-1&size=M").await;
    app.htmx_post("/cart/add", "product_id=chino-1&size=L").await;

    app.htmx_post("/cart/remove", "product_id=crew-1&size=M").await;

    let ids: Vec<_> = app
        .session_state()
        .await
        .items
        .iter()
        .map(|item| item.product.id.to_string())
        .collect();
    assert_eq!(ids, ["tee-1", "chino-1"]);
}

// =============================================================================
// Validation at the HTTP boundary
// =============================================================================

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let mut app = TestApp::new();

    let response = app
        .htmx_post("/cart/add", "product_id=ghost-1&size=M")
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.session_state().await.items.is_empty());
}

#[tokio::test]
async fn test_add_size_not_offered_is_bad_request() {
    let mut app = TestApp::new();

    // The beanie only comes in M
    let response = app
        .htmx_post("/cart/add", "product_id=knit-1&size=XS")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("not offered"));
}

#[tokio::test]
async fn test_add_unknown_size_label_is_rejected() {
    let mut app = TestApp::new();

    let response = app
        .htmx_post("/cart/add", "product_id=shirt-1&size=XXL")
        .await;

    assert!(response.status.is_client_error());
    assert!(app.session_state().await.items.is_empty());
}

// =============================================================================
// Panels and selection
// =============================================================================

#[tokio::test]
async fn test_open_and_close_cart() {
    let mut app = TestApp::new();

    app.htmx_post("/cart/open", "").await;
    assert!(app.session_state().await.cart_open);

    app.htmx_post("/cart/close", "").await;
    assert!(!app.session_state().await.cart_open);
}

#[tokio::test]
async fn test_close_checkout() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "product_id=tee-1&size=M").await;
    app.htmx_post("/checkout", "").await;

    app.htmx_post("/checkout/close", "").await;

    let state = app.session_state().await;
    assert!(!state.checkout_open);
    assert!(!state.cart_open);
    assert_eq!(state.items.len(), 1);
}

#[tokio::test]
async fn test_checkout_with_empty_cart() {
    let mut app = TestApp::new();

    let response = app.htmx_post("/checkout", "").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Nothing to check out yet."));
    assert!(app.session_state().await.checkout_open);
}

#[tokio::test]
async fn test_select_and_deselect_product() {
    let mut app = TestApp::new();

    let response = app.htmx_post("/products/chore-1/select", "").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Canvas Chore Coat"));
    assert!(response.body.contains("product-details"));
    assert_eq!(
        app.session_state().await.selected_product,
        Some(pid("chore-1"))
    );

    let response = app.htmx_post("/products/deselect", "").await;
    assert!(!response.body.contains("product-details"));
    assert_eq!(app.session_state().await.selected_product, None);
}

#[tokio::test]
async fn test_select_leaves_cart_untouched() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "product_id=tee-1&size=M").await;

    app.htmx_post("/products/crew-1/select", "").await;

    let state = app.session_state().await;
    assert_eq!(state.items.len(), 1);
    assert!(state.cart_open);
}

#[tokio::test]
async fn test_select_unknown_product_is_not_found() {
    let mut app = TestApp::new();

    let response = app.htmx_post("/products/ghost-1/select", "").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_select_malformed_id_is_bad_request() {
    let mut app = TestApp::new();

    let response = app.htmx_post("/products/bad%20id/select", "").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// HTMX and plain form responses
// =============================================================================

#[tokio::test]
async fn test_htmx_response_names_changed_aspects() {
    let mut app = TestApp::new();

    let response = app
        .htmx_post("/cart/add", "product_id=shirt-1&size=M")
        .await;

    let trigger = response.header("hx-trigger").unwrap();
    assert!(trigger.contains("cart-updated"));
    assert!(trigger.contains("cart-toggled"));
    assert!(!trigger.contains("checkout-toggled"));
    assert!(response.body.contains(r#"id="overlays""#));
    assert!(response.body.contains("Oxford Button-Down"));
}

#[tokio::test]
async fn test_second_add_only_reports_items() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "product_id=shirt-1&size=M").await;

    let response = app
        .htmx_post("/cart/add", "product_id=shirt-1&size=M")
        .await;

    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));
}

#[tokio::test]
async fn test_checkout_reports_both_panels() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "product_id=shirt-1&size=M").await;

    let response = app.htmx_post("/checkout", "").await;

    let trigger = response.header("hx-trigger").unwrap();
    assert!(trigger.contains("cart-toggled"));
    assert!(trigger.contains("checkout-toggled"));
    assert!(!trigger.contains("cart-updated"));
}

#[tokio::test]
async fn test_no_trigger_when_nothing_changed() {
    let mut app = TestApp::new();

    let response = app.htmx_post("/cart/close", "").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("hx-trigger").is_none());
}

#[tokio::test]
async fn test_plain_form_post_redirects_home() {
    let mut app = TestApp::new();

    let response = app.post_form("/cart/add", "product_id=tee-1&size=L").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION.as_str()), Some("/"));
    assert_eq!(app.session_state().await.items.len(), 1);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_visitors_have_separate_carts() {
    let mut alice = TestApp::new();
    let mut bob = alice.new_visitor();

    alice
        .htmx_post("/cart/add", "product_id=shirt-1&size=M")
        .await;
    bob.htmx_post("/cart/add", "product_id=knit-1&size=M").await;
    bob.htmx_post("/cart/add", "product_id=knit-1&size=M").await;

    let alice_state = alice.session_state().await;
    let bob_state = bob.session_state().await;
    assert_eq!(alice_state.items.len(), 1);
    assert_eq!(alice_state.items[0].product.id, pid("shirt-1"));
    assert_eq!(bob_state.items.len(), 1);
    assert_eq!(bob_state.items[0].quantity(), 2);
}

#[tokio::test]
async fn test_new_visitor_starts_empty() {
    let mut app = TestApp::new();

    let state = app.session_state().await;

    assert!(state.items.is_empty());
    assert!(!state.cart_open);
    assert!(!state.checkout_open);
    assert!(state.selected_product.is_none());
}

#[tokio::test]
async fn test_reads_do_not_create_sessions() {
    let mut app = TestApp::new();

    app.get("/").await;
    app.get("/api/session").await;

    assert!(!app.has_session());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_in_one_session_all_count() {
    let mut app = TestApp::new();
    app.htmx_post("/cart/add", "product_id=shirt-1&size=M").await;
    assert!(app.has_session());

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let mut tab = app.clone();
            tokio::spawn(async move {
                tab.htmx_post("/cart/add", "product_id=shirt-1&size=M")
                    .await
                    .status
            })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    let state = app.session_state().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].quantity(), 21);
}
