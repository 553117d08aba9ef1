//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Every error response has a JSON body of the form `{"error": "..."}`.

use artificial_wearables_core::api::ErrorBody;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::fourthwall::FourthwallError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Fourthwall API operation failed.
    #[error("Fourthwall error: {0}")]
    Upstream(#[from] FourthwallError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Checkout requested for a cart without items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Client exceeded the local rate limit; retry after this many seconds.
    #[error("Rate limited")]
    RateLimited(u64),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Upstream(FourthwallError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Upstream(FourthwallError::RateLimited(_)) | Self::RateLimited(_) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to callers.
    fn public_message(&self) -> String {
        match self {
            Self::Upstream(FourthwallError::NotFound(what)) => format!("Not found: {what}"),
            Self::Upstream(FourthwallError::RateLimited(_)) | Self::RateLimited(_) => {
                "Too many requests, please retry later".to_string()
            }
            // Don't expose internal error details to clients
            Self::Upstream(_) => "External service error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let retry_after = match &self {
            Self::Upstream(FourthwallError::RateLimited(secs)) | Self::RateLimited(secs) => {
                Some(*secs)
            }
            _ => None,
        };

        let mut response = (
            status,
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("variant_id", "var_123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
