//! Artificial Wearables storefront client.
//!
//! - [`CartContainer`] tracks an in-progress order and mirrors it to the
//!   remote cart through a [`CartBackend`]
//! - [`StorefrontApi`] is the HTTP backend for the storefront JSON API and
//!   also exposes catalog reads
//! - [`CartIdStore`] persists the cart identifier between runs
//!
//! # Example
//!
//! ```rust,ignore
//! use artificial_wearables_client::{CartContainer, ClientConfig, FileCartIdStore, StorefrontApi};
//!
//! let config = ClientConfig::from_env()?;
//! let api = StorefrontApi::new(&config)?;
//! let mut cart = CartContainer::new(api.clone(), FileCartIdStore::new(&config.cart_file));
//! cart.restore().await?;
//!
//! let product = api.product("neural-network-tee").await?;
//! let variant = product.default_variant().map(|v| v.id.clone());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod container;
pub mod error;
pub mod store;

pub use api::StorefrontApi;
pub use config::ClientConfig;
pub use container::{CartBackend, CartContainer};
pub use error::{ClientError, StoreError};
pub use store::{CartIdStore, FileCartIdStore, MemoryCartIdStore};
