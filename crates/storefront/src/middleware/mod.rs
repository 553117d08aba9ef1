//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills the span field, echoes `x-request-id`)
//! 4. CORS (only when `CORS_ALLOWED_ORIGIN` is set)
//! 5. Security headers
//! 6. Rate limiting (cart and checkout routes only)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use rate_limit::api_rate_limiter;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
