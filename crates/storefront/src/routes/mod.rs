//! HTTP routes for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Liveness
//! GET    /health/ready          - Readiness (Fourthwall reachable)
//!
//! # Catalog
//! GET    /api/collections       - Collections, led by "All Products"
//! GET    /api/products          - ?collection= listing, or ?slug= detail
//!
//! # Cart (rate limited)
//! GET    /api/cart              - ?cartId= cart contents
//! POST   /api/cart              - Create cart with one item
//! DELETE /api/cart              - ?cartId= delete cart
//! POST   /api/cart/items        - Add item
//! PATCH  /api/cart/items        - Set item quantity
//! DELETE /api/cart/items        - ?cartId=&variantId= remove item
//!
//! # Checkout (rate limited)
//! POST   /api/checkout          - Create checkout session
//! ```

pub mod api;
pub mod health;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, Request, Response, header::CONTENT_TYPE},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    REQUEST_ID_HEADER, api_rate_limiter, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(api::cart::show)
                .post(api::cart::create)
                .delete(api::cart::delete),
        )
        .route(
            "/items",
            post(api::cart::add_item)
                .patch(api::cart::update_item)
                .delete(api::cart::remove_item),
        )
}

/// Create the `/api` routes, rate limiting cart and checkout when enabled.
pub fn api_routes(rate_limit: bool) -> Router<AppState> {
    let mut writes = Router::new()
        .nest("/cart", cart_routes())
        .route("/checkout", post(api::checkout::create));

    if rate_limit {
        writes = writes.layer(api_rate_limiter());
    }

    Router::new()
        .route("/collections", get(api::collections::index))
        .route("/products", get(api::products::index))
        .merge(writes)
}

/// CORS for a configured browser origin, if any.
fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    match HeaderValue::from_str(origin) {
        Ok(value) => Some(
            CorsLayer::new()
                .allow_origin(value)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers([CONTENT_TYPE])
                .expose_headers([axum::http::HeaderName::from_static(REQUEST_ID_HEADER)])
                .max_age(Duration::from_secs(3600)),
        ),
        Err(e) => {
            tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS_ALLOWED_ORIGIN");
            None
        }
    }
}

/// Build the complete application router with middleware.
pub fn router(state: AppState) -> Router {
    let config = state.config();

    let mut app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes(config.rate_limit_enabled))
        .layer(from_fn(security_headers_middleware));

    if let Some(cors) = cors_layer(config.cors_allowed_origin.as_deref()) {
        app = app.layer(cors);
    }

    app.layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
