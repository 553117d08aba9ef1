//! End-to-end test harness for the Artificial Wearables storefront.
//!
//! [`TestContext::start`] wires the three layers together the way they run in
//! production:
//!
//! ```text
//! CartContainer -> StorefrontApi -> storefront router (TCP) -> Fourthwall (wiremock)
//! ```
//!
//! The Fourthwall side is a [`MockServer`]: catalog endpoints serve fixed
//! fixtures and the cart endpoints are backed by [`FakeCarts`], an in-memory
//! cart store that behaves like the real API (variant-keyed add, change, and
//! remove).
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p artificial-wearables-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use artificial_wearables_client::{
    CartContainer, ClientConfig, FileCartIdStore, MemoryCartIdStore, StorefrontApi,
};
use artificial_wearables_core::CurrencyCode;
use artificial_wearables_storefront::config::{CheckoutConfig, FourthwallConfig};
use artificial_wearables_storefront::{AppState, StorefrontConfig, router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Storefront token the fake upstream accepts.
pub const STOREFRONT_TOKEN: &str = "ptkn_7c1e94b2-5a3d-4f08-b6e2-91d04a7f3c58";

/// Checkout domain configured for the storefront under test.
pub const CHECKOUT_DOMAIN: &str = "artificialwearables-shop.fourthwall.com";

/// Variants the fake upstream knows: id, name, unit price, product slug.
pub const VARIANTS: &[(&str, &str, f64, &str)] = &[
    ("var_tee_m", "Neural Network Tee - M", 34.99, "neural-network-tee"),
    ("var_tee_l", "Neural Network Tee - L", 34.99, "neural-network-tee"),
    ("var_hoodie_l", "Algorithm Hoodie - L", 59.99, "algorithm-hoodie"),
];

// =============================================================================
// Test context
// =============================================================================

/// A running storefront in front of a fake Fourthwall.
pub struct TestContext {
    /// Fake Fourthwall API.
    pub upstream: MockServer,
    /// Cart state behind the fake's cart endpoints.
    pub carts: FakeCarts,
    /// Base URL of the running storefront.
    pub storefront_url: Url,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start the fake upstream and serve the storefront router on an
    /// ephemeral port.
    pub async fn start() -> Self {
        let upstream = MockServer::start().await;
        let carts = FakeCarts::default();

        Mock::given(path_regex(r"^/v1/carts"))
            .respond_with(carts.clone())
            .mount(&upstream)
            .await;
        mount_catalog(&upstream).await;

        let state = AppState::new(storefront_config(&upstream.uri()))
            .expect("Failed to create application state");
        let app = router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront listener");
        let addr = listener
            .local_addr()
            .expect("Listener has no local address");

        let server = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Storefront server failed");
        });

        let storefront_url =
            Url::parse(&format!("http://{addr}")).expect("Invalid storefront URL");

        Self {
            upstream,
            carts,
            storefront_url,
            server,
        }
    }

    /// Client configuration pointing at this storefront.
    #[must_use]
    pub fn client_config(&self, cart_file: PathBuf) -> ClientConfig {
        ClientConfig::new(self.storefront_url.clone(), cart_file)
    }

    /// HTTP client for this storefront.
    #[must_use]
    pub fn api(&self) -> StorefrontApi {
        StorefrontApi::new(&self.client_config(PathBuf::from("unused.json")))
            .expect("Failed to build storefront client")
    }

    /// Cart container persisting its identifier in memory.
    #[must_use]
    pub fn memory_cart(&self) -> CartContainer<StorefrontApi, MemoryCartIdStore> {
        CartContainer::new(self.api(), MemoryCartIdStore::new())
    }

    /// Cart container persisting its identifier in `cart_file`.
    #[must_use]
    pub fn file_cart(&self, cart_file: PathBuf) -> CartContainer<StorefrontApi, FileCartIdStore> {
        let config = self.client_config(cart_file);
        let api = StorefrontApi::new(&config).expect("Failed to build storefront client");
        CartContainer::new(api, FileCartIdStore::new(config.cart_file))
    }

    /// Absolute URL of a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.storefront_url.join(path).expect("Invalid path")
    }

    /// Number of requests the upstream received for `path`.
    pub async fn upstream_hits(&self, path: &str) -> usize {
        self.upstream
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A fresh cart file path under the system temp directory.
#[must_use]
pub fn temp_cart_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("aw-integration-{}", uuid::Uuid::new_v4()))
        .join("cart.json")
}

fn storefront_config(upstream_uri: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        fourthwall: FourthwallConfig {
            api_url: Url::parse(upstream_uri).expect("Invalid upstream URL"),
            storefront_token: SecretString::from(STOREFRONT_TOKEN),
            currency: CurrencyCode::USD,
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(300),
        },
        checkout: CheckoutConfig {
            domain: CHECKOUT_DOMAIN.to_string(),
            currency: CurrencyCode::USD,
            session_ttl: Duration::from_secs(1800),
        },
        rate_limit_enabled: true,
        cors_allowed_origin: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

// =============================================================================
// Catalog fixtures
// =============================================================================

fn variant_json(id: &str) -> Value {
    let (name, price, slug) = VARIANTS
        .iter()
        .find(|(v, ..)| *v == id)
        .map_or(("Unknown", 0.0, "unknown"), |(_, name, price, slug)| {
            (*name, *price, *slug)
        });

    json!({
        "id": id,
        "name": name,
        "unitPrice": {"value": price, "currency": "USD"},
        "images": [],
        "stock": {"type": "UNLIMITED"},
        "product": {"slug": slug}
    })
}

fn tee_json() -> Value {
    json!({
        "id": "prod_tee",
        "name": "Neural Network Tee",
        "slug": "neural-network-tee",
        "description": "Soft cotton tee printed with a three-layer perceptron.",
        "images": [{"url": "https://cdn.fourthwall.com/tee.png", "width": 1200, "height": 1200}],
        "variants": [variant_json("var_tee_m"), variant_json("var_tee_l")]
    })
}

fn hoodie_json() -> Value {
    json!({
        "id": "prod_hoodie",
        "name": "Algorithm Hoodie",
        "slug": "algorithm-hoodie",
        "description": "Heavyweight fleece hoodie.",
        "images": [],
        "variants": [variant_json("var_hoodie_l")]
    })
}

/// Mount collections, collection products, and product detail fixtures.
pub async fn mount_catalog(upstream: &MockServer) {
    let catalog_get = |route: &str| {
        Mock::given(method("GET"))
            .and(path(route.to_string()))
            .and(query_param("storefront_token", STOREFRONT_TOKEN))
            .and(query_param("currency", "USD"))
    };

    catalog_get("/v1/collections")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "col_tees", "name": "Tees", "slug": "tees", "productCount": 1},
                {"id": "col_hoodies", "name": "Hoodies", "slug": "hoodies", "productCount": 1,
                 "description": "Stay warm while training.",
                 "coverImage": {"url": "https://cdn.fourthwall.com/hoodies.png"}}
            ]
        })))
        .mount(upstream)
        .await;

    catalog_get("/v1/collections/tees/products")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [tee_json()]})))
        .mount(upstream)
        .await;

    catalog_get("/v1/collections/hoodies/products")
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [hoodie_json()]})),
        )
        .mount(upstream)
        .await;

    catalog_get("/v1/products/neural-network-tee")
        .respond_with(ResponseTemplate::new(200).set_body_json(tee_json()))
        .mount(upstream)
        .await;

    catalog_get("/v1/products/algorithm-hoodie")
        .respond_with(ResponseTemplate::new(200).set_body_json(hoodie_json()))
        .mount(upstream)
        .await;
}

// =============================================================================
// Fake cart store
// =============================================================================

/// In-memory Fourthwall cart endpoints.
///
/// Carts are keyed by ID and hold `(variant, quantity)` lines in insertion
/// order. Unknown variants are rejected with 400, unknown carts with 404.
#[derive(Debug, Clone, Default)]
pub struct FakeCarts {
    state: Arc<Mutex<CartsState>>,
}

#[derive(Debug, Default)]
struct CartsState {
    carts: HashMap<String, Vec<(String, u32)>>,
    created: u32,
}

impl FakeCarts {
    fn lock(&self) -> MutexGuard<'_, CartsState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of carts created so far.
    #[must_use]
    pub fn created(&self) -> u32 {
        self.lock().created
    }

    /// Whether a cart exists.
    #[must_use]
    pub fn exists(&self, cart_id: &str) -> bool {
        self.lock().carts.contains_key(cart_id)
    }

    /// Quantity of a variant in a cart.
    #[must_use]
    pub fn quantity(&self, cart_id: &str, variant_id: &str) -> Option<u32> {
        self.lock()
            .carts
            .get(cart_id)?
            .iter()
            .find(|(v, _)| v == variant_id)
            .map(|(_, q)| *q)
    }

    /// Drop a cart, as if it expired upstream.
    pub fn expire(&self, cart_id: &str) {
        self.lock().carts.remove(cart_id);
    }

    /// Change a cart behind the client's back.
    pub fn set_quantity(&self, cart_id: &str, variant_id: &str, quantity: u32) {
        if let Some(lines) = self.lock().carts.get_mut(cart_id) {
            upsert(lines, variant_id, quantity, false);
        }
    }
}

fn known_variant(id: &str) -> bool {
    VARIANTS.iter().any(|(v, ..)| *v == id)
}

fn upsert(lines: &mut Vec<(String, u32)>, variant_id: &str, quantity: u32, add: bool) {
    if let Some(line) = lines.iter_mut().find(|(v, _)| v == variant_id) {
        line.1 = if add { line.1 + quantity } else { quantity };
    } else {
        lines.push((variant_id.to_string(), quantity));
    }
}

/// `(variantId, quantity)` pairs from an `{items: [...]}` body.
fn body_items(body: &Value) -> Vec<(String, u32)> {
    body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let variant = item["variantId"].as_str()?.to_string();
                    let quantity = item["quantity"]
                        .as_u64()
                        .and_then(|q| u32::try_from(q).ok())
                        .unwrap_or(1);
                    Some((variant, quantity))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn cart_json(id: &str, lines: &[(String, u32)]) -> ResponseTemplate {
    let items: Vec<Value> = lines
        .iter()
        .map(|(variant, quantity)| json!({"variant": variant_json(variant), "quantity": quantity}))
        .collect();
    ResponseTemplate::new(200).set_body_json(json!({"id": id, "items": items}))
}

fn error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({"error": message}))
}

impl Respond for FakeCarts {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let authorized = request
            .url
            .query_pairs()
            .any(|(k, v)| k == "storefront_token" && v == STOREFRONT_TOKEN);
        if !authorized {
            return error(401, "Invalid storefront token");
        }

        let segments: Vec<&str> = request
            .url
            .path_segments()
            .map(Iterator::collect)
            .unwrap_or_default();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let items = body_items(&body);

        let mut state = self.lock();
        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["v1", "carts"]) => {
                if items.iter().any(|(v, _)| !known_variant(v)) {
                    return error(400, "Unknown variant");
                }
                state.created += 1;
                let id = format!("cart_{}", state.created);
                let mut lines = Vec::new();
                for (variant, quantity) in items {
                    upsert(&mut lines, &variant, quantity, true);
                }
                let response = cart_json(&id, &lines);
                state.carts.insert(id, lines);
                response
            }
            ("GET", ["v1", "carts", id]) => state
                .carts
                .get(*id)
                .map_or_else(|| error(404, "Cart not found"), |lines| cart_json(id, lines)),
            ("DELETE", ["v1", "carts", id]) => {
                state.carts.remove(*id);
                ResponseTemplate::new(200)
            }
            ("POST", ["v1", "carts", id, op]) => {
                let Some(lines) = state.carts.get_mut(*id) else {
                    return error(404, "Cart not found");
                };
                match *op {
                    "add" | "change" => {
                        if items.iter().any(|(v, _)| !known_variant(v)) {
                            return error(400, "Unknown variant");
                        }
                        for (variant, quantity) in items {
                            upsert(lines, &variant, quantity, *op == "add");
                        }
                    }
                    "remove" => {
                        lines.retain(|(v, _)| !items.iter().any(|(r, _)| r == v));
                    }
                    _ => return error(404, "Not found"),
                }
                cart_json(id, lines)
            }
            _ => error(404, "Not found"),
        }
    }
}
