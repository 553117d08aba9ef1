//! Checkout session handler.
//!
//! Fourthwall hosts the checkout page; a session is the redirect URL for a
//! non-empty cart plus the time until which the storefront vouches for it.

use artificial_wearables_core::api::{CheckoutRequest, CheckoutSession};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use tracing::instrument;

use super::require;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::fourthwall::conversions::checkout_url;
use crate::state::AppState;

/// Create a checkout session for a cart.
///
/// Fails with 404 if the cart does not exist and 422 if it has no items.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutSession>> {
    let Json(request) = payload?;
    let cart_id = require(Some(request.cart_id), "Cart ID")?;

    let cart = state.fourthwall().get_cart(&cart_id).await?;
    if cart.items.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let checkout = &state.config().checkout;
    let redirect_url = checkout_url(&checkout.domain, checkout.currency, &cart_id)
        .map_err(|e| AppError::Internal(format!("Invalid checkout URL: {e}")))?;
    let ttl = chrono::Duration::from_std(checkout.session_ttl)
        .map_err(|e| AppError::Internal(format!("Invalid checkout session TTL: {e}")))?;

    tracing::info!(cart_id = %cart_id, "Checkout session created");
    add_breadcrumb("checkout", "Started checkout", Some(&[("cart_id", cart_id.as_str())]));

    Ok(Json(CheckoutSession {
        success: true,
        cart_id,
        redirect_url: redirect_url.into(),
        expires_at: Utc::now() + ttl,
    }))
}
