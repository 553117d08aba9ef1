//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `AW_STOREFRONT_URL` - Storefront API base URL (default: <http://127.0.0.1:3000>)
//! - `AW_CART_FILE` - Where the cart ID is kept (default: `$HOME/.artificial-wearables/cart.json`)
//! - `AW_TIMEOUT_SECS` - Request timeout (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_STOREFRONT_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Cannot locate a home directory for the cart file; set AW_CART_FILE")]
    NoHomeDir,
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Storefront API base URL
    pub storefront_url: Url,
    /// Path of the JSON file holding the cart ID
    pub cart_file: PathBuf,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or no cart file
    /// location can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let storefront_url = env_or("AW_STOREFRONT_URL", DEFAULT_STOREFRONT_URL);
        let storefront_url = Url::parse(&storefront_url)
            .map_err(|e| ConfigError::InvalidEnvVar("AW_STOREFRONT_URL".to_string(), e.to_string()))?;

        let cart_file = match optional_env("AW_CART_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_cart_file()?,
        };

        let timeout = optional_env("AW_TIMEOUT_SECS")
            .map(|s| {
                s.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("AW_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            storefront_url,
            cart_file,
            timeout: Duration::from_secs(timeout),
        })
    }

    /// Configuration pointing at `storefront_url` with default settings
    /// and the given cart file.
    #[must_use]
    pub fn new(storefront_url: Url, cart_file: PathBuf) -> Self {
        Self {
            storefront_url,
            cart_file,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn default_cart_file() -> Result<PathBuf, ConfigError> {
    let home = optional_env("HOME")
        .or_else(|| optional_env("USERPROFILE"))
        .ok_or(ConfigError::NoHomeDir)?;
    Ok(PathBuf::from(home)
        .join(".artificial-wearables")
        .join("cart.json"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_timeout() {
        let config = ClientConfig::new(
            Url::parse("http://localhost:3000").unwrap(),
            PathBuf::from("/tmp/cart.json"),
        );
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
