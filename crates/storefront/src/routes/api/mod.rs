//! JSON API handlers under `/api`.
//!
//! Request bodies and query strings are extracted as `Result<_, Rejection>`
//! so malformed input still gets a JSON `{"error": ...}` body.

pub mod cart;
pub mod checkout;
pub mod collections;
pub mod products;

use crate::error::AppError;

/// Reject a missing or blank identifier with a 400.
fn require<T: AsRef<str>>(value: Option<T>, what: &str) -> Result<T, AppError> {
    value
        .filter(|v| !v.as_ref().trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{what} is required")))
}
