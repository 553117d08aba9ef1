//! Cart management commands.

use artificial_wearables_core::VariantId;
use artificial_wearables_core::api::{ProductDetail, VariantSummary};

use super::{Cart, CommandError};

/// Print the cart lines and subtotal.
#[allow(clippy::print_stdout)]
pub fn show(cart: &Cart) {
    let Some(cart_id) = cart.cart_id() else {
        println!("No cart yet. Add something with `aw-cli cart add <slug>`.");
        return;
    };

    println!("Cart {cart_id}");
    if cart.lines().is_empty() {
        println!("  (empty)");
        return;
    }

    for line in cart.lines() {
        println!(
            "  {:<24} {:<32} {:>3} x {:>10} = {:>10}",
            line.variant_id.as_str(),
            line.name,
            line.quantity,
            line.price().display(),
            line.line_total().display()
        );
    }
    println!("  {} items, subtotal {}", cart.item_count(), cart.subtotal());
}

/// Add a product variant to the cart.
pub async fn add(
    cart: &mut Cart,
    slug: &str,
    variant: Option<&str>,
    quantity: u32,
) -> Result<(), CommandError> {
    let product = cart.backend().product(slug).await?;
    let chosen = pick_variant(&product, variant)?.clone();

    cart.add_item(&product.summary_for(&chosen), &chosen.id, quantity)
        .await?;
    show(cart);
    Ok(())
}

/// Set the quantity of a line.
pub async fn update(cart: &mut Cart, variant: &str, quantity: u32) -> Result<(), CommandError> {
    cart.update_quantity(&VariantId::new(variant), quantity)
        .await?;
    show(cart);
    Ok(())
}

/// Remove a line.
pub async fn remove(cart: &mut Cart, variant: &str) -> Result<(), CommandError> {
    cart.remove_item(&VariantId::new(variant)).await?;
    show(cart);
    Ok(())
}

/// Print the checkout URL.
#[allow(clippy::print_stdout)]
pub async fn checkout(cart: &mut Cart) -> Result<(), CommandError> {
    let url = cart.checkout_url().await?;
    println!("{url}");
    Ok(())
}

/// Forget the cart.
#[allow(clippy::print_stdout)]
pub fn clear(cart: &mut Cart) -> Result<(), CommandError> {
    cart.clear()?;
    println!("Cart cleared");
    Ok(())
}

/// The requested variant, or the product's default one.
fn pick_variant<'a>(
    product: &'a ProductDetail,
    variant: Option<&str>,
) -> Result<&'a VariantSummary, CommandError> {
    match variant {
        Some(id) => product
            .variants
            .iter()
            .find(|v| v.id.as_str() == id)
            .ok_or_else(|| CommandError::UnknownVariant {
                slug: product.slug.clone(),
                variant: id.to_string(),
            }),
        None => product
            .default_variant()
            .ok_or_else(|| CommandError::NoVariants(product.slug.clone())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use artificial_wearables_core::{CurrencyCode, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn product(variants: &[(&str, bool)]) -> ProductDetail {
        ProductDetail {
            id: ProductId::new("prod_1"),
            name: "Neural Network Tee".to_string(),
            slug: "neural-network-tee".to_string(),
            description: String::new(),
            images: vec![],
            variants: variants
                .iter()
                .map(|(id, in_stock)| VariantSummary {
                    id: VariantId::new(*id),
                    name: id.to_uppercase(),
                    price: Decimal::new(3499, 2),
                    currency: CurrencyCode::USD,
                    sku: None,
                    in_stock: *in_stock,
                })
                .collect(),
        }
    }

    #[test]
    fn test_pick_variant_defaults_to_in_stock() {
        let p = product(&[("s", false), ("m", true)]);
        assert_eq!(pick_variant(&p, None).unwrap().id.as_str(), "m");
    }

    #[test]
    fn test_pick_variant_by_id() {
        let p = product(&[("s", false), ("m", true)]);
        assert_eq!(pick_variant(&p, Some("s")).unwrap().id.as_str(), "s");
        assert!(matches!(
            pick_variant(&p, Some("xl")),
            Err(CommandError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_pick_variant_without_variants() {
        let p = product(&[]);
        assert!(matches!(pick_variant(&p, None), Err(CommandError::NoVariants(_))));
    }
}
