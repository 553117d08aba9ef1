//! Conversions from Fourthwall wire types to the local API types.

use artificial_wearables_core::api::{
    CartView, CollectionSummary, ImageView, ProductDetail, ProductSummary, VariantSummary,
};
use artificial_wearables_core::{CartId, CartLine, CartLines, CollectionId, CurrencyCode};
use rust_decimal::Decimal;
use url::Url;

use super::types::{Cart, CartItem, Collection, Image, Money, Product, Variant};

/// Slug of the synthesized collection that lists every product.
pub const ALL_PRODUCTS_SLUG: &str = "all";

const CART_PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

/// Parse an upstream currency string, falling back when it is unsupported.
fn convert_currency(code: &str, fallback: CurrencyCode) -> CurrencyCode {
    code.parse().unwrap_or_else(|_| {
        tracing::warn!(currency = %code, fallback = %fallback, "Unsupported currency from Fourthwall");
        fallback
    })
}

fn convert_money(money: &Money, fallback: CurrencyCode) -> (Decimal, CurrencyCode) {
    (money.value, convert_currency(&money.currency, fallback))
}

fn convert_image(image: Image) -> ImageView {
    ImageView {
        url: image.url,
        width: image.width,
        height: image.height,
    }
}

// =============================================================================
// Products
// =============================================================================

/// Listing view of a product.
///
/// Price comes from the first variant (0 when there is none); the image is
/// the first product image, else `/images/{slug}.jpg`.
#[must_use]
pub fn convert_product_summary(product: Product, fallback: CurrencyCode) -> ProductSummary {
    let (price, currency) = product
        .variants
        .first()
        .map_or((Decimal::ZERO, fallback), |v| {
            convert_money(&v.unit_price, fallback)
        });

    let image_url = product
        .images
        .into_iter()
        .next()
        .map_or_else(|| format!("/images/{}.jpg", product.slug), |i| i.url);

    ProductSummary {
        id: product.id,
        name: product.name,
        price,
        currency,
        image_url,
        slug: product.slug,
    }
}

fn convert_variant(variant: Variant, fallback: CurrencyCode) -> VariantSummary {
    let (price, currency) = convert_money(&variant.unit_price, fallback);
    VariantSummary {
        id: variant.id,
        name: variant.name,
        price,
        currency,
        sku: variant.sku,
        // Missing stock info means Fourthwall does not track it
        in_stock: variant.stock.as_ref().is_none_or(super::types::Stock::is_available),
    }
}

/// Detail view of a product with all images and variants.
#[must_use]
pub fn convert_product_detail(product: Product, fallback: CurrencyCode) -> ProductDetail {
    ProductDetail {
        id: product.id,
        name: product.name,
        slug: product.slug,
        description: product.description,
        images: product.images.into_iter().map(convert_image).collect(),
        variants: product
            .variants
            .into_iter()
            .map(|v| convert_variant(v, fallback))
            .collect(),
    }
}

// =============================================================================
// Collections
// =============================================================================

/// Collection picker view of a collection.
#[must_use]
pub fn convert_collection(collection: Collection) -> CollectionSummary {
    CollectionSummary {
        id: collection.id,
        name: collection.name,
        slug: collection.slug,
        description: collection.description.unwrap_or_default(),
        product_count: collection.product_count.unwrap_or(0),
        image_url: collection.cover_image.map(|i| i.url),
    }
}

/// Prepend the "All Products" pseudo-collection unless one with slug `all`
/// already exists. Its product count is the sum of the others.
#[must_use]
pub fn with_all_products(mut collections: Vec<CollectionSummary>) -> Vec<CollectionSummary> {
    if collections.iter().any(|c| c.slug == ALL_PRODUCTS_SLUG) {
        return collections;
    }

    let product_count = collections
        .iter()
        .fold(0u32, |total, c| total.saturating_add(c.product_count));

    collections.insert(
        0,
        CollectionSummary {
            id: CollectionId::new(ALL_PRODUCTS_SLUG),
            name: "All Products".to_string(),
            slug: ALL_PRODUCTS_SLUG.to_string(),
            description: "All available products".to_string(),
            product_count,
            image_url: None,
        },
    );
    collections
}

// =============================================================================
// Cart
// =============================================================================

fn convert_cart_item(item: CartItem, fallback: CurrencyCode) -> CartLine {
    let (unit_price, currency) = convert_money(&item.variant.unit_price, fallback);
    let variant = item.variant;

    CartLine {
        variant_id: variant.id,
        name: variant.name,
        unit_price,
        currency,
        quantity: item.quantity,
        image_url: variant
            .images
            .into_iter()
            .next()
            .map_or_else(|| CART_PLACEHOLDER_IMAGE.to_string(), |i| i.url),
        product_slug: variant.product.map(|p| p.slug),
    }
}

/// Local view of a remote cart with totals.
#[must_use]
pub fn convert_cart(cart: Cart, fallback: CurrencyCode) -> CartView {
    let lines: CartLines = cart
        .items
        .into_iter()
        .map(|item| convert_cart_item(item, fallback))
        .collect();
    let subtotal = lines.subtotal(fallback);

    CartView {
        id: cart.id,
        item_count: lines.item_count(),
        subtotal: subtotal.amount,
        currency: subtotal.currency_code,
        items: lines.iter().cloned().collect(),
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Hosted checkout URL for a cart.
///
/// # Errors
///
/// Returns an error if `domain` does not form a valid URL.
pub fn checkout_url(
    domain: &str,
    currency: CurrencyCode,
    cart_id: &CartId,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("https://{domain}/checkout/"))?;
    url.query_pairs_mut()
        .append_pair("cartCurrency", currency.code())
        .append_pair("cartId", cart_id.as_str());
    Ok(url)
}
