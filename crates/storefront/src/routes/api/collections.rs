//! Collection listing handler.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use super::products::CATALOG_CACHE_CONTROL;
use crate::error::Result;
use crate::fourthwall::conversions::{convert_collection, with_all_products};
use crate::state::AppState;

/// List collections, led by the "All Products" pseudo-collection.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    let collections = state
        .fourthwall()
        .get_collections()
        .await?
        .into_iter()
        .map(convert_collection)
        .collect();

    Ok((CATALOG_CACHE_CONTROL, Json(with_all_products(collections))).into_response())
}
