//! Product route handlers.

use artificial_wearables_core::api::ProductSummary;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderName, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::fourthwall::conversions::{convert_product_detail, convert_product_summary};
use crate::state::AppState;

/// Browsers may reuse catalog responses briefly; the server caches longer.
pub const CATALOG_CACHE_CONTROL: [(HeaderName, &str); 1] =
    [(CACHE_CONTROL, "public, max-age=60")];

/// Query parameters for product lookups.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Collection to list (defaults to the first collection).
    pub collection: Option<String>,
    /// Single product to fetch in detail.
    pub slug: Option<String>,
}

/// List products in a collection, or fetch one product by slug.
///
/// With `?slug=` the response is a `ProductDetail`; otherwise it is an array
/// of `ProductSummary` for `?collection=` or the first collection.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductsQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query?;
    let fourthwall = state.fourthwall();
    let currency = fourthwall.currency();

    if let Some(slug) = query.slug.filter(|s| !s.trim().is_empty()) {
        let product = fourthwall.get_product_by_slug(&slug).await?;
        return Ok((
            CATALOG_CACHE_CONTROL,
            Json(convert_product_detail(product, currency)),
        )
            .into_response());
    }

    let collection = match query.collection.filter(|s| !s.trim().is_empty()) {
        Some(slug) => Some(slug),
        None => fourthwall
            .get_collections()
            .await?
            .into_iter()
            .next()
            .map(|c| c.slug),
    };

    // A shop without collections has nothing to list
    let Some(collection) = collection else {
        tracing::debug!("No collections, returning empty product list");
        return Ok((CATALOG_CACHE_CONTROL, Json(Vec::<ProductSummary>::new())).into_response());
    };

    let products: Vec<_> = fourthwall
        .get_collection_products(&collection)
        .await?
        .into_iter()
        .map(|p| convert_product_summary(p, currency))
        .collect();

    Ok((CATALOG_CACHE_CONTROL, Json(products)).into_response())
}
