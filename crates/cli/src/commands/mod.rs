//! Subcommand implementations.

pub mod cart;
pub mod catalog;

use artificial_wearables_client::config::ConfigError;
use artificial_wearables_client::{
    CartContainer, ClientConfig, ClientError, FileCartIdStore, StorefrontApi,
};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Product {slug} has no variant {variant}")]
    UnknownVariant { slug: String, variant: String },

    #[error("Product {0} has no purchasable variants")]
    NoVariants(String),
}

/// Cart container used by the CLI.
pub type Cart = CartContainer<StorefrontApi, FileCartIdStore>;

/// Shared state for a command run.
pub struct Context {
    pub config: ClientConfig,
    pub api: StorefrontApi,
}

impl Context {
    /// Build the API client from the environment.
    pub fn from_env() -> Result<Self, CommandError> {
        let config = ClientConfig::from_env()?;
        let api = StorefrontApi::new(&config)?;
        Ok(Self { config, api })
    }

    /// A cart container over the cart file, without reading it.
    pub fn unrestored_cart(&self) -> Cart {
        CartContainer::new(
            self.api.clone(),
            FileCartIdStore::new(&self.config.cart_file),
        )
    }

    /// The persisted cart, refetched from the storefront.
    pub async fn cart(&self) -> Result<Cart, CommandError> {
        let mut cart = self.unrestored_cart();
        cart.restore().await?;
        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use artificial_wearables_client::CartIdStore;

    use super::*;

    fn context(cart_file: &std::path::Path) -> Context {
        // Nothing listens here; clearing must not touch the network.
        let config = ClientConfig::new("http://127.0.0.1:9".parse().unwrap(), cart_file.into());
        let api = StorefrontApi::new(&config).unwrap();
        Context { config, api }
    }

    #[test]
    fn test_clear_removes_corrupt_cart_file() {
        let path = std::env::temp_dir().join(format!("aw-cli-corrupt-{}.json", std::process::id()));
        std::fs::write(&path, "not json").unwrap();

        let ctx = context(&path);
        assert!(FileCartIdStore::new(&path).load().is_err());

        let mut cart = ctx.unrestored_cart();
        cart::clear(&mut cart).unwrap();

        assert!(!path.exists());
        assert!(cart.cart_id().is_none());
    }

    #[test]
    fn test_clear_without_cart_file_succeeds() {
        let path = std::env::temp_dir().join(format!("aw-cli-missing-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut cart = context(&path).unrestored_cart();
        cart::clear(&mut cart).unwrap();

        assert!(!path.exists());
    }
}
