//! Cart container driven end to end through the storefront.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use artificial_wearables_client::{CartIdStore, ClientError, FileCartIdStore};
use artificial_wearables_core::api::ProductSummary;
use artificial_wearables_core::{CartId, CurrencyCode, ProductId, VariantId};
use artificial_wearables_integration_tests::{CHECKOUT_DOMAIN, TestContext, temp_cart_file};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

/// Listing view of the tee in the given size, as the CLI builds it.
async fn tee(ctx: &TestContext, variant: &str) -> (ProductSummary, VariantId) {
    let product = ctx.api().product("neural-network-tee").await.unwrap();
    let variant = product
        .variants
        .iter()
        .find(|v| v.id.as_str() == variant)
        .unwrap();
    (product.summary_for(variant), variant.id.clone())
}

#[tokio::test]
async fn test_first_add_creates_one_cart_and_persists_id() {
    let ctx = TestContext::start().await;
    let cart_file = temp_cart_file();
    let mut cart = ctx.file_cart(cart_file.clone());
    let (product, variant) = tee(&ctx, "var_tee_m").await;

    cart.add_item(&product, &variant, 2).await.unwrap();

    assert_eq!(ctx.carts.created(), 1);
    let cart_id = cart.cart_id().cloned().unwrap();
    assert_eq!(
        FileCartIdStore::new(&cart_file).load().unwrap(),
        Some(cart_id.clone())
    );
    assert_eq!(ctx.carts.quantity(cart_id.as_str(), "var_tee_m"), Some(2));

    // Lines come from the refetched remote cart
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.subtotal().display(), "$69.98");
    assert!(cart.last_error().is_none());
}

#[tokio::test]
async fn test_adding_present_variant_increments_quantity() {
    let ctx = TestContext::start().await;
    let mut cart = ctx.memory_cart();
    let (product, variant) = tee(&ctx, "var_tee_m").await;

    cart.add_item(&product, &variant, 1).await.unwrap();
    cart.add_item(&product, &variant, 1).await.unwrap();

    assert_eq!(ctx.carts.created(), 1);
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines().get(&variant).unwrap().quantity, 2);

    let cart_id = cart.cart_id().unwrap().as_str().to_string();
    assert_eq!(ctx.carts.quantity(&cart_id, "var_tee_m"), Some(2));

    // Remote and local agree after a full refetch
    cart.refresh().await.unwrap();
    assert_eq!(cart.lines().get(&variant).unwrap().quantity, 2);
}

#[tokio::test]
async fn test_update_quantity_floors_at_one() {
    let ctx = TestContext::start().await;
    let mut cart = ctx.memory_cart();
    let (product, variant) = tee(&ctx, "var_tee_l").await;
    cart.add_item(&product, &variant, 3).await.unwrap();

    cart.update_quantity(&variant, 0).await.unwrap();

    let cart_id = cart.cart_id().unwrap().as_str().to_string();
    assert_eq!(cart.lines().get(&variant).unwrap().quantity, 1);
    assert_eq!(ctx.carts.quantity(&cart_id, "var_tee_l"), Some(1));
}

#[tokio::test]
async fn test_remove_then_checkout_reports_empty_cart() {
    let ctx = TestContext::start().await;
    let mut cart = ctx.memory_cart();
    let (product, variant) = tee(&ctx, "var_tee_m").await;
    cart.add_item(&product, &variant, 1).await.unwrap();

    cart.remove_item(&variant).await.unwrap();
    assert!(cart.lines().is_empty());

    let err = cart.checkout_url().await.unwrap_err();
    assert!(matches!(err, ClientError::CartEmpty));
    assert_eq!(cart.last_error(), Some("Your shopping cart is empty"));
}

#[tokio::test]
async fn test_checkout_url_points_at_hosted_checkout() {
    let ctx = TestContext::start().await;
    let mut cart = ctx.memory_cart();
    let (product, variant) = tee(&ctx, "var_tee_m").await;
    cart.add_item(&product, &variant, 1).await.unwrap();
    let cart_id = cart.cart_id().cloned().unwrap();

    let url = cart.checkout_url().await.unwrap();

    assert_eq!(
        url,
        format!("https://{CHECKOUT_DOMAIN}/checkout/?cartCurrency=USD&cartId={cart_id}")
    );
}

#[tokio::test]
async fn test_clear_forgets_cart_but_leaves_remote() {
    let ctx = TestContext::start().await;
    let cart_file = temp_cart_file();
    let mut cart = ctx.file_cart(cart_file.clone());
    let (product, variant) = tee(&ctx, "var_tee_m").await;
    cart.add_item(&product, &variant, 1).await.unwrap();
    let cart_id = cart.cart_id().cloned().unwrap();

    cart.clear().unwrap();

    assert!(cart.cart_id().is_none());
    assert!(cart.lines().is_empty());
    assert!(!cart_file.exists());
    assert_eq!(FileCartIdStore::new(&cart_file).load().unwrap(), None);
    assert!(ctx.carts.exists(cart_id.as_str()));

    // The next add starts a fresh cart
    cart.add_item(&product, &variant, 1).await.unwrap();
    assert_eq!(ctx.carts.created(), 2);
    assert_ne!(cart.cart_id(), Some(&cart_id));
}

#[tokio::test]
async fn test_restore_picks_up_persisted_cart() {
    let ctx = TestContext::start().await;
    let cart_file = temp_cart_file();
    let (product, variant) = tee(&ctx, "var_tee_m").await;

    let mut first = ctx.file_cart(cart_file.clone());
    first.add_item(&product, &variant, 2).await.unwrap();
    let cart_id = first.cart_id().cloned().unwrap();

    let mut second = ctx.file_cart(cart_file);
    second.restore().await.unwrap();

    assert_eq!(second.cart_id(), Some(&cart_id));
    assert_eq!(second.item_count(), 2);
    assert_eq!(
        second.lines().get(&variant).unwrap().product_slug.as_deref(),
        Some("neural-network-tee")
    );
}

#[tokio::test]
async fn test_restore_forgets_expired_cart() {
    let ctx = TestContext::start().await;
    let cart_file = temp_cart_file();
    let (product, variant) = tee(&ctx, "var_tee_m").await;

    let mut first = ctx.file_cart(cart_file.clone());
    first.add_item(&product, &variant, 1).await.unwrap();
    ctx.carts.expire(first.cart_id().unwrap().as_str());

    let mut second = ctx.file_cart(cart_file.clone());
    second.restore().await.unwrap();

    assert!(second.cart_id().is_none());
    assert!(second.lines().is_empty());
    assert!(second.last_error().is_none());
    assert_eq!(FileCartIdStore::new(&cart_file).load().unwrap(), None);
}

#[tokio::test]
async fn test_failed_first_add_sets_error_flag() {
    let ctx = TestContext::start().await;
    let mut cart = ctx.memory_cart();
    let product = ProductSummary {
        id: ProductId::new("prod_ghost"),
        name: "Ghost Tee".to_string(),
        price: Decimal::new(2999, 2),
        currency: CurrencyCode::USD,
        image_url: "/images/ghost-tee.jpg".to_string(),
        slug: "ghost-tee".to_string(),
    };

    let err = cart
        .add_item(&product, &VariantId::new("var_ghost"), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 502, .. }));
    assert!(cart.last_error().is_some());
    assert!(cart.cart_id().is_none());
    assert!(cart.lines().is_empty());
    assert_eq!(ctx.carts.created(), 0);
}

#[tokio::test]
async fn test_failed_add_leaves_local_lines_untouched() {
    let ctx = TestContext::start().await;
    let mut cart = ctx.memory_cart();
    let (product, variant) = tee(&ctx, "var_tee_m").await;
    cart.add_item(&product, &variant, 1).await.unwrap();

    let err = cart
        .add_item(&product, &VariantId::new("var_ghost"), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 502, .. }));
    assert!(cart.last_error().is_some());
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.item_count(), 1);

    // A later success clears the flag
    cart.refresh().await.unwrap();
    assert!(cart.last_error().is_none());
}

#[tokio::test]
async fn test_refresh_repairs_divergence() {
    let ctx = TestContext::start().await;
    let mut cart = ctx.memory_cart();
    let (product, variant) = tee(&ctx, "var_tee_m").await;
    cart.add_item(&product, &variant, 1).await.unwrap();
    let cart_id = cart.cart_id().unwrap().as_str().to_string();

    // Another client changes the same cart
    ctx.carts.set_quantity(&cart_id, "var_hoodie_l", 1);
    ctx.carts.set_quantity(&cart_id, "var_tee_m", 4);
    assert_eq!(cart.item_count(), 1);

    cart.refresh().await.unwrap();
    assert_eq!(cart.item_count(), 5);
    assert_eq!(cart.subtotal().display(), "$199.95");
}

#[tokio::test]
async fn test_no_cart_operations_fail() {
    let ctx = TestContext::start().await;
    let mut cart = ctx.memory_cart();

    assert!(matches!(
        cart.remove_item(&VariantId::new("var_tee_m")).await,
        Err(ClientError::NoCart)
    ));
    assert!(matches!(cart.checkout_url().await, Err(ClientError::NoCart)));
    assert_eq!(cart.last_error(), Some("No cart available"));
}

#[tokio::test]
async fn test_checkout_endpoint_rejects_empty_cart() {
    let ctx = TestContext::start().await;
    let client = reqwest::Client::new();

    let response = client
        .post(ctx.url("/api/cart"))
        .json(&json!({"variantId": "var_tee_m"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created: Value = response.json().await.unwrap();
    let cart_id = CartId::new(created["id"].as_str().unwrap());
    assert_eq!(created["itemCount"], 1);

    let mut url = ctx.url("/api/cart/items");
    url.query_pairs_mut()
        .append_pair("cartId", cart_id.as_str())
        .append_pair("variantId", "var_tee_m");
    let emptied: Value = client
        .delete(url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(emptied["items"], json!([]));

    let response = client
        .post(ctx.url("/api/checkout"))
        .json(&json!({"cartId": cart_id}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Cart is empty"}));
}

#[tokio::test]
async fn test_delete_cart_removes_remote_cart() {
    let ctx = TestContext::start().await;
    let mut cart = ctx.memory_cart();
    let (product, variant) = tee(&ctx, "var_tee_m").await;
    cart.add_item(&product, &variant, 1).await.unwrap();
    let cart_id = cart.cart_id().cloned().unwrap();

    ctx.api().delete_cart(&cart_id).await.unwrap();

    assert!(!ctx.carts.exists(cart_id.as_str()));
    assert!(matches!(
        cart.refresh().await,
        Err(ClientError::NotFound(_))
    ));
}
