//! Cart route handlers.
//!
//! Carts live in Fourthwall; the client keeps the cart ID and passes it on
//! every call. Each handler returns the cart as it stands after the change.

use artificial_wearables_core::CartId;
use artificial_wearables_core::api::{
    AddItemRequest, CartView, CreateCartRequest, DeletedResponse, RemoveItemQuery,
    UpdateItemRequest,
};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::Deserialize;
use tracing::instrument;

use super::require;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::fourthwall::LineItemInput;
use crate::fourthwall::conversions::convert_cart;
use crate::state::AppState;

/// `?cartId=` query for cart reads and deletes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuery {
    pub cart_id: Option<CartId>,
}

fn require_quantity(quantity: u32) -> Result<u32> {
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }
    Ok(quantity)
}

/// Get a cart.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    query: std::result::Result<Query<CartQuery>, QueryRejection>,
) -> Result<Json<CartView>> {
    let Query(query) = query?;
    let cart_id = require(query.cart_id, "Cart ID")?;

    let cart = state.fourthwall().get_cart(&cart_id).await?;
    Ok(Json(convert_cart(cart, state.fourthwall().currency())))
}

/// Create a cart holding one variant.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateCartRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(request) = payload?;
    let variant_id = require(Some(request.variant_id), "Variant ID")?;
    let quantity = require_quantity(request.quantity)?;

    let cart = state
        .fourthwall()
        .create_cart(vec![LineItemInput::new(variant_id.clone(), quantity)])
        .await?;

    tracing::info!(cart_id = %cart.id, variant_id = %variant_id, "Cart created");
    add_breadcrumb(
        "cart",
        "Created cart",
        Some(&[("cart_id", cart.id.as_str()), ("variant_id", variant_id.as_str())]),
    );

    Ok(Json(convert_cart(cart, state.fourthwall().currency())))
}

/// Delete a cart.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    query: std::result::Result<Query<CartQuery>, QueryRejection>,
) -> Result<Json<DeletedResponse>> {
    let Query(query) = query?;
    let cart_id = require(query.cart_id, "Cart ID")?;

    state.fourthwall().delete_cart(&cart_id).await?;
    add_breadcrumb("cart", "Deleted cart", Some(&[("cart_id", cart_id.as_str())]));

    Ok(Json(DeletedResponse { success: true }))
}

/// Add a variant to a cart; an existing line's quantity is incremented.
#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(request) = payload?;
    let cart_id = require(Some(request.cart_id), "Cart ID")?;
    let variant_id = require(Some(request.variant_id), "Variant ID")?;
    let quantity = require_quantity(request.quantity)?;

    let cart = state
        .fourthwall()
        .add_to_cart(
            &cart_id,
            vec![LineItemInput::new(variant_id.clone(), quantity)],
        )
        .await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("cart_id", cart_id.as_str()), ("variant_id", variant_id.as_str())]),
    );

    Ok(Json(convert_cart(cart, state.fourthwall().currency())))
}

/// Set the quantity of a cart line.
#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(request) = payload?;
    let cart_id = require(Some(request.cart_id), "Cart ID")?;
    let variant_id = require(Some(request.variant_id), "Variant ID")?;
    let quantity = require_quantity(request.quantity)?;

    let cart = state
        .fourthwall()
        .change_cart_items(
            &cart_id,
            vec![LineItemInput::new(variant_id.clone(), quantity)],
        )
        .await?;

    add_breadcrumb(
        "cart",
        "Updated cart quantity",
        Some(&[("cart_id", cart_id.as_str()), ("variant_id", variant_id.as_str())]),
    );

    Ok(Json(convert_cart(cart, state.fourthwall().currency())))
}

/// Remove a variant's line from a cart.
#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    query: std::result::Result<Query<RemoveItemQuery>, QueryRejection>,
) -> Result<Json<CartView>> {
    let Query(query) = query?;
    let cart_id = require(Some(query.cart_id), "Cart ID")?;
    let variant_id = require(Some(query.variant_id), "Variant ID")?;

    let cart = state
        .fourthwall()
        .remove_from_cart(&cart_id, vec![variant_id.clone()])
        .await?;

    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("cart_id", cart_id.as_str()), ("variant_id", variant_id.as_str())]),
    );

    Ok(Json(convert_cart(cart, state.fourthwall().currency())))
}
