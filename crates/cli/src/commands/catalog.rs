//! Catalog browsing commands.

use artificial_wearables_core::Price;

use super::{CommandError, Context};

/// Print all collections.
#[allow(clippy::print_stdout)]
pub async fn collections(ctx: &Context) -> Result<(), CommandError> {
    for collection in ctx.api.collections().await? {
        println!(
            "{:<24} {:<32} {:>4} products",
            collection.slug, collection.name, collection.product_count
        );
    }
    Ok(())
}

/// Print the products of a collection.
#[allow(clippy::print_stdout)]
pub async fn products(ctx: &Context, collection: Option<&str>) -> Result<(), CommandError> {
    let products = ctx.api.products(collection).await?;
    if products.is_empty() {
        println!("No products found");
        return Ok(());
    }

    for product in products {
        println!(
            "{:<32} {:<32} {:>10}",
            product.slug,
            product.name,
            product.price().display()
        );
    }
    Ok(())
}

/// Print a product with its variants.
#[allow(clippy::print_stdout)]
pub async fn product(ctx: &Context, slug: &str) -> Result<(), CommandError> {
    let product = ctx.api.product(slug).await?;

    println!("{} ({})", product.name, product.slug);
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    println!();

    let default = product.default_variant().map(|v| v.id.clone());
    for variant in &product.variants {
        let marker = if Some(&variant.id) == default.as_ref() { "*" } else { " " };
        let stock = if variant.in_stock { "" } else { " (sold out)" };
        println!(
            "{marker} {:<24} {:<16} {:>10}{stock}",
            variant.id.as_str(),
            variant.name,
            Price::new(variant.price, variant.currency).display()
        );
    }
    Ok(())
}
