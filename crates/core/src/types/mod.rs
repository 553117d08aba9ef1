//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;

pub use cart::{CartLine, CartLines};
pub use id::*;
pub use price::{CurrencyCode, ParseCurrencyError, Price};
