//! Fourthwall Storefront API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`, JSON bodies in camelCase
//! - Fourthwall is source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for catalog responses (carts are never cached)
//! - The storefront token travels as the `storefront_token` query parameter
//!   on every request
//!
//! # Example
//!
//! ```rust,ignore
//! use artificial_wearables_storefront::fourthwall::{FourthwallClient, LineItemInput};
//!
//! let client = FourthwallClient::new(&config.fourthwall)?;
//!
//! let product = client.get_product_by_slug("neural-network-tee").await?;
//! let cart = client
//!     .create_cart(vec![LineItemInput::new(product.variants[0].id.clone(), 1)])
//!     .await?;
//! ```

mod cache;
mod client;
pub mod conversions;
pub mod types;

pub use client::FourthwallClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the Fourthwall Storefront API.
#[derive(Debug, Error)]
pub enum FourthwallError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Fourthwall answered with a non-success status.
    #[error("Fourthwall API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Fourthwall.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}
