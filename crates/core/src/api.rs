//! JSON bodies of the local storefront API.
//!
//! The server produces these from Fourthwall responses and the client
//! consumes them, so both sides share one definition. Field names are
//! camelCase on the wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CartId, CartLine, CollectionId, CurrencyCode, Price, ProductId, VariantId};

/// Default quantity when a request omits it.
const fn default_quantity() -> u32 {
    1
}

// =============================================================================
// Catalog
// =============================================================================

/// Product as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    /// Price of the first variant (0 when the product has none).
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    pub image_url: String,
    pub slug: String,
}

impl ProductSummary {
    /// Listing price with currency.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::new(self.price, self.currency)
    }
}

/// Product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    pub id: VariantId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub in_stock: bool,
}

/// Product detail page data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub images: Vec<ImageView>,
    pub variants: Vec<VariantSummary>,
}

impl ProductDetail {
    /// The variant to preselect: first in-stock variant, else the first one.
    #[must_use]
    pub fn default_variant(&self) -> Option<&VariantSummary> {
        self.variants
            .iter()
            .find(|v| v.in_stock)
            .or_else(|| self.variants.first())
    }

    /// Listing view of this product for the given variant.
    ///
    /// Used when adding a product to the cart from its detail page.
    #[must_use]
    pub fn summary_for(&self, variant: &VariantSummary) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            price: variant.price,
            currency: variant.currency,
            image_url: self
                .images
                .first()
                .map_or_else(|| format!("/images/{}.jpg", self.slug), |i| i.url.clone()),
            slug: self.slug.clone(),
        }
    }
}

/// Collection as shown in the collection picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub id: CollectionId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub product_count: u32,
    pub image_url: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// Cart contents returned by every cart endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: CartId,
    pub items: Vec<CartLine>,
    pub item_count: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub currency: CurrencyCode,
}

/// `POST /api/cart` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartRequest {
    pub variant_id: VariantId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// `POST /api/cart/items` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub cart_id: CartId,
    pub variant_id: VariantId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// `PATCH /api/cart/items` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub cart_id: CartId,
    pub variant_id: VariantId,
    pub quantity: u32,
}

/// `DELETE /api/cart/items` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemQuery {
    pub cart_id: CartId,
    pub variant_id: VariantId,
}

/// `DELETE /api/cart` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub success: bool,
}

// =============================================================================
// Checkout
// =============================================================================

/// `POST /api/checkout` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart_id: CartId,
}

/// A checkout session: where to send the buyer to pay, and until when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub success: bool,
    pub cart_id: CartId,
    pub redirect_url: String,
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// Errors
// =============================================================================

/// Body of every non-2xx JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
