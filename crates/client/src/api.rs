//! HTTP client for the storefront JSON API.

use artificial_wearables_core::api::{
    AddItemRequest, CartView, CheckoutRequest, CheckoutSession, CollectionSummary,
    CreateCartRequest, DeletedResponse, ErrorBody, ProductDetail, ProductSummary,
    RemoveItemQuery, UpdateItemRequest,
};
use artificial_wearables_core::{CartId, VariantId};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::config::ClientConfig;
use crate::container::CartBackend;
use crate::error::ClientError;

/// Client for the storefront API (`/api/...`).
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    client: reqwest::Client,
    base_url: Url,
}

impl StorefrontApi {
    /// Create a new storefront API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("artificial-wearables-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // `Url::join` replaces the last segment unless the path ends with '/'
        let mut base_url = config.storefront_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Decode a success body, or turn the JSON error body into a `ClientError`.
    async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(message));
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List collections.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn collections(&self) -> Result<Vec<CollectionSummary>, ClientError> {
        let url = self.endpoint("api/collections", &[])?;
        Self::handle(self.client.get(url).send().await?).await
    }

    /// List products in a collection (the first collection when `None`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        collection: Option<&str>,
    ) -> Result<Vec<ProductSummary>, ClientError> {
        let query: Vec<(&str, &str)> = collection.map(|c| ("collection", c)).into_iter().collect();
        let url = self.endpoint("api/products", &query)?;
        Self::handle(self.client.get(url).send().await?).await
    }

    /// Fetch one product with its variants.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown slug, or an error if the request fails.
    #[instrument(skip(self))]
    pub async fn product(&self, slug: &str) -> Result<ProductDetail, ClientError> {
        let url = self.endpoint("api/products", &[("slug", slug)])?;
        Self::handle(self.client.get(url).send().await?).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Delete a remote cart.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn delete_cart(&self, cart_id: &CartId) -> Result<(), ClientError> {
        let url = self.endpoint("api/cart", &[("cartId", cart_id.as_str())])?;
        let _: DeletedResponse = Self::handle(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}

impl CartBackend for StorefrontApi {
    #[instrument(skip(self), fields(variant_id = %variant_id))]
    async fn create_cart(
        &self,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<CartId, ClientError> {
        let url = self.endpoint("api/cart", &[])?;
        let body = CreateCartRequest {
            variant_id: variant_id.clone(),
            quantity,
        };
        let view: CartView = Self::handle(self.client.post(url).json(&body).send().await?).await?;
        Ok(view.id)
    }

    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn fetch_cart(&self, cart_id: &CartId) -> Result<CartView, ClientError> {
        let url = self.endpoint("api/cart", &[("cartId", cart_id.as_str())])?;
        Self::handle(self.client.get(url).send().await?).await
    }

    #[instrument(skip(self), fields(cart_id = %cart_id, variant_id = %variant_id))]
    async fn add_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let url = self.endpoint("api/cart/items", &[])?;
        let body = AddItemRequest {
            cart_id: cart_id.clone(),
            variant_id: variant_id.clone(),
            quantity,
        };
        let _: CartView = Self::handle(self.client.post(url).json(&body).send().await?).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(cart_id = %cart_id, variant_id = %variant_id))]
    async fn update_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let url = self.endpoint("api/cart/items", &[])?;
        let body = UpdateItemRequest {
            cart_id: cart_id.clone(),
            variant_id: variant_id.clone(),
            quantity,
        };
        let _: CartView = Self::handle(self.client.patch(url).json(&body).send().await?).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(cart_id = %cart_id, variant_id = %variant_id))]
    async fn remove_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
    ) -> Result<(), ClientError> {
        let url = self.endpoint("api/cart/items", &[])?;
        let query = RemoveItemQuery {
            cart_id: cart_id.clone(),
            variant_id: variant_id.clone(),
        };
        let _: CartView = Self::handle(self.client.delete(url).query(&query).send().await?).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn checkout(&self, cart_id: &CartId) -> Result<CheckoutSession, ClientError> {
        let url = self.endpoint("api/checkout", &[])?;
        let body = CheckoutRequest {
            cart_id: cart_id.clone(),
        };
        Self::handle(self.client.post(url).json(&body).send().await?).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn api_for(server: &MockServer) -> StorefrontApi {
        StorefrontApi::new(&ClientConfig::new(
            Url::parse(&server.uri()).unwrap(),
            PathBuf::from("unused.json"),
        ))
        .unwrap()
    }

    fn cart_view(id: &str) -> serde_json::Value {
        json!({"id": id, "items": [], "itemCount": 0, "subtotal": 0.0, "currency": "USD"})
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let api = StorefrontApi::new(&ClientConfig::new(
            Url::parse("https://shop.example.com/storefront").unwrap(),
            PathBuf::from("unused.json"),
        ))
        .unwrap();
        assert_eq!(
            api.endpoint("api/cart", &[("cartId", "c 1")]).unwrap().as_str(),
            "https://shop.example.com/storefront/api/cart?cartId=c+1"
        );
    }

    #[tokio::test]
    async fn test_create_cart_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/cart"))
            .and(body_json(json!({"variantId": "var_m", "quantity": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_view("cart_9")))
            .expect(1)
            .mount(&server)
            .await;

        let id = api_for(&server)
            .create_cart(&VariantId::new("var_m"), 2)
            .await
            .unwrap();
        assert_eq!(id, CartId::new("cart_9"));
    }

    #[tokio::test]
    async fn test_remove_item_sends_ids_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/cart/items"))
            .and(query_param("cartId", "cart 1"))
            .and(query_param("variantId", "var_tee_m"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cart 1",
                "items": [],
                "itemCount": 0,
                "subtotal": 0.0,
                "currency": "USD"
            })))
            .expect(1)
            .mount(&server)
            .await;

        api_for(&server)
            .remove_item(&CartId::new("cart 1"), &VariantId::new("var_tee_m"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_not_found_uses_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cart"))
            .and(query_param("cartId", "gone"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Not found: cart gone"})),
            )
            .mount(&server)
            .await;

        let err = api_for(&server)
            .fetch_cart(&CartId::new("gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(ref m) if m == "Not found: cart gone"));
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/checkout"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"error": "Cart is empty"})))
            .mount(&server)
            .await;

        let err = api_for(&server)
            .checkout(&CartId::new("c1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 422, ref message } if message == "Cart is empty"));
    }

    #[tokio::test]
    async fn test_checkout_reads_redirect_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/checkout"))
            .and(body_json(json!({"cartId": "c1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "cartId": "c1",
                "redirectUrl": "https://artificialwearables-shop.fourthwall.com/checkout/?cartCurrency=USD&cartId=c1",
                "expiresAt": "2026-01-01T00:30:00Z"
            })))
            .mount(&server)
            .await;

        let session = api_for(&server).checkout(&CartId::new("c1")).await.unwrap();
        assert!(session.redirect_url.ends_with("cartId=c1"));
    }

    #[tokio::test]
    async fn test_products_passes_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("collection", "tees"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "prod_1",
                "name": "Neural Network Tee",
                "price": 34.99,
                "currency": "USD",
                "imageUrl": "/images/neural-network-tee.jpg",
                "slug": "neural-network-tee"
            }])))
            .mount(&server)
            .await;

        let products = api_for(&server).products(Some("tees")).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price().display(), "$34.99");
    }
}
