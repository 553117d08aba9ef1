//! Fourthwall Storefront API client implementation.
//!
//! Caches products and collections using `moka` (TTL from config).

use std::sync::Arc;

use artificial_wearables_core::{CartId, CurrencyCode, VariantId};
use moka::future::Cache;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::FourthwallError;
use super::cache::{CacheKey, CacheValue};
use super::types::{
    Cart, Collection, ItemsBody, LineItemInput, Paginated, Product, VariantRef,
};
use crate::config::FourthwallConfig;

/// Truncate an upstream body for logs and error messages.
fn truncate(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}

// =============================================================================
// FourthwallClient
// =============================================================================

/// Client for the Fourthwall Storefront API.
///
/// Provides access to products, collections, and cart operations.
/// Products and collections are cached; carts never are.
#[derive(Clone)]
pub struct FourthwallClient {
    inner: Arc<FourthwallClientInner>,
}

struct FourthwallClientInner {
    client: reqwest::Client,
    base_url: String,
    storefront_token: SecretString,
    currency: CurrencyCode,
    cache: Cache<CacheKey, CacheValue>,
}

impl FourthwallClient {
    /// Create a new Fourthwall client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &FourthwallConfig) -> Result<Self, FourthwallError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                "artificial-wearables-storefront/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            inner: Arc::new(FourthwallClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                storefront_token: config.storefront_token.clone(),
                currency: config.currency,
                cache,
            }),
        })
    }

    /// Currency requested for catalog prices.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.currency
    }

    /// Build `{base}/v1/{path}` with the token (and optionally the currency)
    /// as query parameters. Path segments are percent-encoded.
    fn url(&self, segments: &[&str], with_currency: bool) -> Result<Url, FourthwallError> {
        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let mut url = Url::parse(&format!("{}/v1/{path}", self.inner.base_url))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(
                "storefront_token",
                self.inner.storefront_token.expose_secret(),
            );
            if with_currency {
                query.append_pair("currency", self.inner.currency.code());
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner
            .client
            .request(method, url)
            .header("Content-Type", "application/json")
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder, resource: &str) -> Result<String, FourthwallError> {
        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(FourthwallError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(resource = %resource, "Fourthwall resource not found");
            return Err(FourthwallError::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                resource = %resource,
                body = %truncate(&response_text, 500),
                "Fourthwall API returned non-success status"
            );
            return Err(FourthwallError::Api {
                status: status.as_u16(),
                message: truncate(&response_text, 200),
            });
        }

        Ok(response_text)
    }

    /// Send a request and parse the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T, FourthwallError> {
        let response_text = self.send(request, resource).await?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                resource = %resource,
                body = %truncate(&response_text, 500),
                "Failed to parse Fourthwall response"
            );
            FourthwallError::Parse(e)
        })
    }

    async fn post_items<T: Serialize + Send>(
        &self,
        url: Url,
        items: Vec<T>,
        resource: &str,
    ) -> Result<Cart, FourthwallError> {
        let request = self.request(Method::POST, url).json(&ItemsBody { items });
        self.execute(request, resource).await
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Product, FourthwallError> {
        let cache_key = CacheKey::Product(slug.to_string());

        // Check cache
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.url(&["products", slug], true)?;
        let product: Product = self
            .execute(
                self.request(Method::GET, url),
                &format!("product {slug}"),
            )
            .await?;

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the products in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is not found or the API request fails.
    #[instrument(skip(self), fields(collection = %slug))]
    pub async fn get_collection_products(
        &self,
        slug: &str,
    ) -> Result<Vec<Product>, FourthwallError> {
        let cache_key = CacheKey::CollectionProducts(slug.to_string());

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection products");
            return Ok(products);
        }

        let url = self.url(&["collections", slug, "products"], true)?;
        let page: Paginated<Product> = self
            .execute(
                self.request(Method::GET, url),
                &format!("collection {slug}"),
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.results.clone()))
            .await;

        Ok(page.results)
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get all collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self) -> Result<Vec<Collection>, FourthwallError> {
        if let Some(CacheValue::Collections(collections)) =
            self.inner.cache.get(&CacheKey::Collections).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let collections = self.fetch_collections().await?;

        self.inner
            .cache
            .insert(
                CacheKey::Collections,
                CacheValue::Collections(collections.clone()),
            )
            .await;

        Ok(collections)
    }

    async fn fetch_collections(&self) -> Result<Vec<Collection>, FourthwallError> {
        let url = self.url(&["collections"], true)?;
        let page: Paginated<Collection> = self
            .execute(self.request(Method::GET, url), "collections")
            .await?;
        Ok(page.results)
    }

    /// Check that Fourthwall is reachable and accepts the token.
    ///
    /// Bypasses the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), FourthwallError> {
        self.fetch_collections().await.map(|_| ())
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Get a cart by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the cart does not exist, or an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, FourthwallError> {
        let url = self.url(&["carts", cart_id.as_str()], false)?;
        self.execute(
            self.request(Method::GET, url),
            &format!("cart {cart_id}"),
        )
        .await
    }

    /// Create a new cart containing the given items.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn create_cart(&self, items: Vec<LineItemInput>) -> Result<Cart, FourthwallError> {
        let url = self.url(&["carts"], false)?;
        let cart = self.post_items(url, items, "new cart").await?;
        debug!(cart_id = %cart.id, "Created cart");
        Ok(cart)
    }

    /// Add items to a cart. Quantities add to existing lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, items), fields(cart_id = %cart_id, item_count = items.len()))]
    pub async fn add_to_cart(
        &self,
        cart_id: &CartId,
        items: Vec<LineItemInput>,
    ) -> Result<Cart, FourthwallError> {
        let url = self.url(&["carts", cart_id.as_str(), "add"], false)?;
        self.post_items(url, items, &format!("cart {cart_id}")).await
    }

    /// Set the quantity of existing cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, items), fields(cart_id = %cart_id, item_count = items.len()))]
    pub async fn change_cart_items(
        &self,
        cart_id: &CartId,
        items: Vec<LineItemInput>,
    ) -> Result<Cart, FourthwallError> {
        let url = self.url(&["carts", cart_id.as_str(), "change"], false)?;
        self.post_items(url, items, &format!("cart {cart_id}")).await
    }

    /// Remove variants from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, variant_ids), fields(cart_id = %cart_id, item_count = variant_ids.len()))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &CartId,
        variant_ids: Vec<VariantId>,
    ) -> Result<Cart, FourthwallError> {
        let url = self.url(&["carts", cart_id.as_str(), "remove"], false)?;
        let items = variant_ids
            .into_iter()
            .map(|variant_id| VariantRef { variant_id })
            .collect();
        self.post_items(url, items, &format!("cart {cart_id}")).await
    }

    /// Delete a cart.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the cart does not exist, or an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn delete_cart(&self, cart_id: &CartId) -> Result<(), FourthwallError> {
        let url = self.url(&["carts", cart_id.as_str()], false)?;
        self.send(
            self.request(Method::DELETE, url),
            &format!("cart {cart_id}"),
        )
        .await
        .map(|_| ())
    }
}
