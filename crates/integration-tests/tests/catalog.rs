//! Catalog reads and server plumbing through the running storefront.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use artificial_wearables_client::ClientError;
use artificial_wearables_integration_tests::TestContext;
use reqwest::StatusCode;
use reqwest::header::CACHE_CONTROL;

#[tokio::test]
async fn test_collections_start_with_all_products() {
    let ctx = TestContext::start().await;

    let collections = ctx.api().collections().await.unwrap();

    let slugs: Vec<&str> = collections.iter().map(|c| c.slug.as_str()).collect();
    assert_eq!(slugs, ["all", "tees", "hoodies"]);
    assert_eq!(collections[0].name, "All Products");
    assert_eq!(collections[0].product_count, 2);
    assert_eq!(collections[1].description, "");
    assert_eq!(
        collections[2].image_url.as_deref(),
        Some("https://cdn.fourthwall.com/hoodies.png")
    );
}

#[tokio::test]
async fn test_catalog_reads_are_cached() {
    let ctx = TestContext::start().await;
    let api = ctx.api();

    api.collections().await.unwrap();
    api.collections().await.unwrap();
    api.product("neural-network-tee").await.unwrap();
    api.product("neural-network-tee").await.unwrap();

    assert_eq!(ctx.upstream_hits("/v1/collections").await, 1);
    assert_eq!(ctx.upstream_hits("/v1/products/neural-network-tee").await, 1);
}

#[tokio::test]
async fn test_products_default_to_first_collection() {
    let ctx = TestContext::start().await;

    let products = ctx.api().products(None).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].slug, "neural-network-tee");
    assert_eq!(products[0].price().display(), "$34.99");
    assert_eq!(products[0].image_url, "https://cdn.fourthwall.com/tee.png");
}

#[tokio::test]
async fn test_products_in_named_collection() {
    let ctx = TestContext::start().await;

    let products = ctx.api().products(Some("hoodies")).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Algorithm Hoodie");
    assert_eq!(products[0].image_url, "/images/algorithm-hoodie.jpg");
}

#[tokio::test]
async fn test_product_detail() {
    let ctx = TestContext::start().await;

    let product = ctx.api().product("neural-network-tee").await.unwrap();

    assert_eq!(product.variants.len(), 2);
    assert!(product.variants.iter().all(|v| v.in_stock));
    assert_eq!(
        product.default_variant().map(|v| v.id.as_str()),
        Some("var_tee_m")
    );
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let ctx = TestContext::start().await;

    let err = ctx.api().product("quantum-socks").await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_health_and_readiness() {
    let ctx = TestContext::start().await;
    let client = reqwest::Client::new();

    let health = client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await.unwrap(), "ok");

    let ready = client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_catalog_response_headers() {
    let ctx = TestContext::start().await;

    let response = reqwest::Client::new()
        .get(ctx.url("/api/collections"))
        .header("x-request-id", "it-req-1")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[CACHE_CONTROL], "public, max-age=60");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-request-id"], "it-req-1");
}

#[tokio::test]
async fn test_missing_cart_id_is_bad_request() {
    let ctx = TestContext::start().await;

    let response = reqwest::Client::new()
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Bad request: Cart ID is required");
}
