//! Client error types.

use thiserror::Error;

/// Errors from the cart identifier store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the cart file failed.
    #[error("Cart file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart file is not valid JSON.
    #[error("Cart file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the storefront client and cart container.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The storefront answered with an error.
    #[error("Storefront error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The storefront reported the resource missing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation needs a cart and none exists yet.
    #[error("No cart available")]
    NoCart,

    /// Checkout was requested for a cart without items.
    #[error("Your shopping cart is empty")]
    CartEmpty,

    /// Persisting the cart identifier failed.
    #[error("Cart storage error: {0}")]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Whether the storefront reported the resource missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
