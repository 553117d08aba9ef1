//! Artificial Wearables storefront library.
//!
//! A stateless JSON API in front of the Fourthwall Storefront API: catalog
//! reads (cached), cart operations, and checkout session creation. Exposed
//! as a library so the router can be driven in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod fourthwall;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::StorefrontConfig;
pub use routes::router;
pub use state::AppState;
