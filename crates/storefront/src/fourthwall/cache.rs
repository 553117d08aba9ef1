//! Cache types for Fourthwall catalog responses.

use super::types::{Collection, Product};

/// Cache key for products and collections.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    CollectionProducts(String),
    Collections,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Collections(Vec<Collection>),
}
