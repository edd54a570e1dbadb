//! Request-level tests: one call per endpoint through `HttpStoreApi`.

use rust_decimal::Decimal;
use vastrakala_core::{
    CartLineDraft, CartLineId, Email, GUEST_OWNER_KEY, ProductId, ProductQuery, Quantity,
    SortOrder, UserId,
};
use vastrakala_integration_tests::{MockBackend, product};
use vastrakala_storefront::api::{ApiError, HttpStoreApi, LoginCredentials, NewCartLine, StoreApi};

async fn setup() -> (MockBackend, HttpStoreApi, tempfile::TempDir) {
    let backend = MockBackend::spawn(vec![
        product("p-1", "Banarasi Silk Saree", 4500),
        product("p-2", "Cotton Kurti", 899),
        product("p-3", "Chanderi Dupatta", 1299),
    ])
    .await
    .expect("Failed to start mock backend");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = backend.config(dir.path());
    let api = HttpStoreApi::new(&config.api).expect("Failed to build client");
    (backend, api, dir)
}

async fn draft(api: &HttpStoreApi, id: &str, qty: u32) -> CartLineDraft {
    let p = api.product(&ProductId::new(id)).await.expect("product");
    CartLineDraft::for_product(&p, None, None, Quantity::new(qty).expect("qty")).expect("draft")
}

#[tokio::test]
async fn test_catalog_filters_and_sort_pass_through() {
    let (_backend, api, _dir) = setup().await;

    let query = ProductQuery {
        min_price: Some(Decimal::from(1000)),
        sort_by: Some(SortOrder::PriceAsc),
        ..ProductQuery::default()
    };
    let products = api.products(&query).await.expect("products");
    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p-3", "p-1"]);

    let query = ProductQuery {
        search: Some("kurti".to_string()),
        ..ProductQuery::default()
    };
    let products = api.products(&query).await.expect("products");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Cotton Kurti");
}

#[tokio::test]
async fn test_filter_options() {
    let (_backend, api, _dir) = setup().await;
    let filters = api.filter_options().await.expect("filters");
    assert_eq!(filters.fabrics, vec!["Silk".to_string()]);
    assert_eq!(filters.price_range.min_price, Decimal::from(899));
    assert_eq!(filters.price_range.max_price, Decimal::from(4500));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let (_backend, api, _dir) = setup().await;
    let err = api
        .product(&ProductId::new("missing"))
        .await
        .expect_err("unknown product");
    assert!(err.is_not_found(), "got {err:?}");
    assert!(matches!(err, ApiError::NotFound(detail) if detail == "Product not found"));
}

#[tokio::test]
async fn test_product_lookups_are_cached() {
    let (backend, api, _dir) = setup().await;
    let id = ProductId::new("p-2");
    api.product(&id).await.expect("first lookup");
    api.product(&id).await.expect("second lookup");

    let hits = backend
        .requests()
        .iter()
        .filter(|r| r.as_str() == "GET /products/p-2")
        .count();
    assert_eq!(hits, 1);
}

#[tokio::test]
async fn test_cart_endpoints() {
    let (backend, api, _dir) = setup().await;

    let line = NewCartLine::new(GUEST_OWNER_KEY, draft(&api, "p-1", 1).await);
    let first = api.add_cart_line(&line).await.expect("add");
    let merged = api.add_cart_line(&line).await.expect("add again");
    assert_eq!(first.id, merged.id);
    assert_eq!(merged.quantity.get(), 2);

    let updated = api
        .update_cart_line(&merged.id, Quantity::new(5).expect("qty"))
        .await
        .expect("update");
    assert_eq!(updated.quantity.get(), 5);

    let cart = api.cart(GUEST_OWNER_KEY).await.expect("cart");
    assert_eq!(cart.len(), 1);
    assert_eq!(backend.cart_of(GUEST_OWNER_KEY).len(), 1);

    api.remove_cart_line(&merged.id).await.expect("remove");
    let err = api
        .remove_cart_line(&merged.id)
        .await
        .expect_err("second remove");
    assert!(err.is_not_found());

    let err = api
        .update_cart_line(&CartLineId::new("gone"), Quantity::ONE)
        .await
        .expect_err("unknown line");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_clear_cart_only_touches_owner() {
    let (backend, api, _dir) = setup().await;
    let guest_line = NewCartLine::new(GUEST_OWNER_KEY, draft(&api, "p-1", 1).await);
    let user_line = NewCartLine::new("u-1", draft(&api, "p-2", 1).await);
    api.add_cart_line(&guest_line).await.expect("guest add");
    api.add_cart_line(&user_line).await.expect("user add");

    api.clear_cart("u-1").await.expect("clear");
    assert!(backend.cart_of("u-1").is_empty());
    assert_eq!(backend.cart_of(GUEST_OWNER_KEY).len(), 1);
}

#[tokio::test]
async fn test_cart_with_zero_quantity_line_still_loads() {
    let (backend, api, _dir) = setup().await;
    let kept = NewCartLine::new(GUEST_OWNER_KEY, draft(&api, "p-1", 2).await);
    let broken = NewCartLine::new(GUEST_OWNER_KEY, draft(&api, "p-2", 1).await);
    api.add_cart_line(&kept).await.expect("add");
    let broken = api.add_cart_line(&broken).await.expect("add");
    backend.set_raw_quantity(&broken.id, 0);

    let cart = api.cart(GUEST_OWNER_KEY).await.expect("mixed cart decodes");
    assert_eq!(cart.len(), 2);
    let quantity_of = |id: &str| {
        cart.iter()
            .find(|l| l.product_id.as_str() == id)
            .map(|l| l.quantity.get())
    };
    assert_eq!(quantity_of("p-1"), Some(2));
    assert_eq!(quantity_of("p-2"), Some(1));
}

#[tokio::test]
async fn test_wishlist_endpoints() {
    let (_backend, api, _dir) = setup().await;
    let user = UserId::new("u-7");
    let pid = ProductId::new("p-3");

    let first = api.add_to_wishlist(&user, &pid).await.expect("add");
    let again = api.add_to_wishlist(&user, &pid).await.expect("add again");
    assert_eq!(first.id, again.id);

    assert!(api.wishlist_contains(&user, &pid).await.expect("check"));
    let entries = api.wishlist(&user).await.expect("wishlist");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].product_id(), &pid);

    api.remove_from_wishlist(&user, &pid).await.expect("remove");
    assert!(!api.wishlist_contains(&user, &pid).await.expect("check"));
    let err = api
        .remove_from_wishlist(&user, &pid)
        .await
        .expect_err("second remove");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_auth_exchange_reuses_account_by_email() {
    let (_backend, api, _dir) = setup().await;
    let creds = LoginCredentials::new(
        Email::parse("asha@example.in").expect("email"),
        "Asha",
        "google-sub-1",
    );

    let first = api.authenticate("google", &creds).await.expect("first");
    assert!(first.is_new);
    let second = api.authenticate("google", &creds).await.expect("second");
    assert!(!second.is_new);
    assert_eq!(first.user.id, second.user.id);
}

#[tokio::test]
async fn test_error_body_carries_detail() {
    let (backend, _api, _dir) = setup().await;
    let resp = reqwest::get(format!("{}/api/orders/nope", backend.base_url()))
        .await
        .expect("request");
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body["detail"], "Order not found");
}
