//! Artificial Wearables Core - Shared types library.
//!
//! This crate provides common types used across all storefront components:
//! - `storefront` - Local API server proxying the Fourthwall Storefront API
//! - `client` - Cart state container and HTTP client for the local API
//! - `cli` - Command-line tools for browsing the catalog and managing a cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows the server and the client to share one wire format.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, and cart line items
//! - [`api`] - JSON request and response bodies of the local storefront API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod types;

pub use types::*;
