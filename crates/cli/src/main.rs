//! Artificial Wearables CLI - Browse the catalog and manage a cart.
//!
//! # Usage
//!
//! ```bash
//! # List collections, then the products in one
//! aw-cli collections
//! aw-cli products --collection tees
//!
//! # Show a product and its variants
//! aw-cli product neural-network-tee
//!
//! # Add the default variant, or a specific one
//! aw-cli cart add neural-network-tee
//! aw-cli cart add neural-network-tee --variant var_tee_m -q 2
//!
//! # Review and hand off to checkout
//! aw-cli cart show
//! aw-cli cart checkout
//! ```
//!
//! # Environment Variables
//!
//! - `AW_STOREFRONT_URL` - Storefront API base URL (default: <http://127.0.0.1:3000>)
//! - `AW_CART_FILE` - Where the cart ID is kept (default: `$HOME/.artificial-wearables/cart.json`)
//! - `AW_TIMEOUT_SECS` - Request timeout (default: 10)
//! - `RUST_LOG` - Log filter (default: `warn`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "aw-cli")]
#[command(author, version, about = "Artificial Wearables storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List collections
    Collections,
    /// List products in a collection
    Products {
        /// Collection slug (default: the first collection)
        #[arg(short, long)]
        collection: Option<String>,
    },
    /// Show a product and its variants
    Product {
        /// Product slug
        slug: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product slug
        slug: String,

        /// Variant ID (default: first in-stock variant)
        #[arg(short, long)]
        variant: Option<String>,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a line
    Update {
        /// Variant ID
        variant: String,

        /// New quantity (at least 1)
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Variant ID
        variant: String,
    },
    /// Print the checkout URL for the cart
    Checkout,
    /// Forget the cart
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Collections => commands::catalog::collections(&ctx).await?,
        Commands::Products { collection } => {
            commands::catalog::products(&ctx, collection.as_deref()).await?;
        }
        Commands::Product { slug } => commands::catalog::product(&ctx, &slug).await?,
        Commands::Cart { action } => {
            // Clearing must work even when the cart file or storefront is broken.
            let mut cart = if matches!(action, CartAction::Clear) {
                ctx.unrestored_cart()
            } else {
                ctx.cart().await?
            };
            match action {
                CartAction::Show => commands::cart::show(&cart),
                CartAction::Add {
                    slug,
                    variant,
                    quantity,
                } => {
                    commands::cart::add(&mut cart, &slug, variant.as_deref(), quantity).await?;
                }
                CartAction::Update { variant, quantity } => {
                    commands::cart::update(&mut cart, &variant, quantity).await?;
                }
                CartAction::Remove { variant } => commands::cart::remove(&mut cart, &variant).await?,
                CartAction::Checkout => commands::cart::checkout(&mut cart).await?,
                CartAction::Clear => commands::cart::clear(&mut cart)?,
            }
        }
    }
    Ok(())
}
