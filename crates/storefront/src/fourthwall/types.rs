//! Wire types for the Fourthwall Storefront API.
//!
//! Only the fields the storefront reads are modelled; serde ignores the rest.

use artificial_wearables_core::{CartId, CollectionId, ProductId, VariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog
// =============================================================================

/// Monetary amount with an ISO 4217 currency string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Money {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub currency: String,
}

/// Product or variant image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Stock level of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    /// `UNLIMITED` or `LIMITED`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Units left for `LIMITED` stock.
    #[serde(default)]
    pub in_stock: Option<i64>,
}

impl Stock {
    /// Whether at least one unit can be bought.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.kind.eq_ignore_ascii_case("UNLIMITED") || self.in_stock.is_some_and(|n| n > 0)
    }
}

/// Parent product reference embedded in cart variants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductRef {
    pub slug: String,
}

/// A purchasable product variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: VariantId,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub unit_price: Money,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub stock: Option<Stock>,
    #[serde(default)]
    pub product: Option<ProductRef>,
}

/// A product with its variants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// A product collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_count: Option<u32>,
    #[serde(default)]
    pub cover_image: Option<Image>,
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

// =============================================================================
// Cart
// =============================================================================

/// A remote cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

/// One variant line in a remote cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartItem {
    pub variant: Variant,
    pub quantity: u32,
}

/// Variant and quantity sent when creating a cart, adding, or changing items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub variant_id: VariantId,
    pub quantity: u32,
}

impl LineItemInput {
    /// Create a new line item input.
    #[must_use]
    pub const fn new(variant_id: VariantId, quantity: u32) -> Self {
        Self {
            variant_id,
            quantity,
        }
    }
}

/// Variant reference sent when removing items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRef {
    pub variant_id: VariantId,
}

/// Request body shared by the cart item endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemsBody<T> {
    pub items: Vec<T>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_deserializes_from_fourthwall_shape() {
        let cart: Cart = serde_json::from_value(json!({
            "id": "cart_1",
            "items": [{
                "variant": {
                    "id": "var_m",
                    "name": "Neural Network Tee - M",
                    "unitPrice": {"value": 34.99, "currency": "USD"},
                    "images": [{"id": "img", "url": "https://cdn.fourthwall.com/tee.png"}],
                    "stock": {"type": "LIMITED", "inStock": 3},
                    "product": {"slug": "neural-network-tee", "name": "Neural Network Tee"}
                },
                "quantity": 2
            }],
            "metadata": {}
        }))
        .unwrap();

        assert_eq!(cart.id, CartId::new("cart_1"));
        let item = &cart.items[0];
        assert_eq!(item.quantity, 2);
        assert_eq!(item.variant.unit_price.value, Decimal::new(3499, 2));
        assert_eq!(
            item.variant.product.as_ref().map(|p| p.slug.as_str()),
            Some("neural-network-tee")
        );
        assert!(item.variant.stock.as_ref().unwrap().is_available());
    }

    #[test]
    fn test_stock_availability() {
        let unlimited = Stock {
            kind: "UNLIMITED".to_string(),
            in_stock: None,
        };
        let sold_out = Stock {
            kind: "LIMITED".to_string(),
            in_stock: Some(0),
        };
        assert!(unlimited.is_available());
        assert!(!sold_out.is_available());
    }

    #[test]
    fn test_items_body_serializes_camel_case() {
        let body = ItemsBody {
            items: vec![LineItemInput::new(VariantId::new("v1"), 2)],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"items": [{"variantId": "v1", "quantity": 2}]})
        );
    }
}
