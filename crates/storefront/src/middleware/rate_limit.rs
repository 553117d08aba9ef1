//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Cart and checkout endpoints proxy writes to Fourthwall, so they are
//! limited per client IP (~100/min). Catalog reads are cached and unlimited.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use crate::error::AppError;

/// Proxy headers carrying the real client IP, most trusted first.
const CLIENT_IP_HEADERS: &[&str] = &["cf-connecting-ip", "x-real-ip", "fly-client-ip"];

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that prefers proxy headers and falls back to the peer
/// address from `ConnectInfo`.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

/// Client IP as reported by a reverse proxy, if any.
fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let header_ip = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };

    header_ip(CLIENT_IP_HEADERS[0]).or_else(|| {
        // First hop of X-Forwarded-For is the original client
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .or_else(|| CLIENT_IP_HEADERS[1..].iter().find_map(|h| header_ip(h)))
    })
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        forwarded_ip(req.headers())
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for cart and checkout: ~100 requests per minute per IP.
///
/// Configuration: 1 request per second (replenish), burst of 50.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(1)` and `burst_size(50)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(1)
        .burst_size(50)
        .finish()
        .expect("rate limiter config with per_second(1) and burst_size(50) is valid");
    GovernorLayer::new(Arc::new(config)).error_handler(rate_limit_response)
}

/// Render limiter rejections with the API's JSON error body.
fn rate_limit_response(error: GovernorError) -> Response {
    match error {
        GovernorError::TooManyRequests { wait_time, .. } => {
            tracing::warn!(wait_time, "Rate limit exceeded");
            AppError::RateLimited(wait_time.max(1)).into_response()
        }
        GovernorError::UnableToExtractKey => {
            AppError::Internal("Unable to determine client address".to_string()).into_response()
        }
        GovernorError::Other { code, msg, .. } => {
            AppError::Internal(format!("Rate limiter error {code}: {}", msg.unwrap_or_default()))
                .into_response()
        }
    }
}
