//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOURTHWALL_STOREFRONT_TOKEN` - Fourthwall Storefront API token (`ptkn_...`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `FOURTHWALL_API_URL` - Storefront API base URL (default: <https://storefront-api.fourthwall.com>)
//! - `FOURTHWALL_CHECKOUT_DOMAIN` - Hosted checkout domain (default: artificialwearables-shop.fourthwall.com)
//! - `STOREFRONT_CURRENCY` - Currency for prices and checkout (default: USD)
//! - `FOURTHWALL_TIMEOUT_SECS` - Upstream request timeout (default: 10)
//! - `CATALOG_CACHE_TTL_SECS` - Product/collection cache lifetime (default: 300)
//! - `CHECKOUT_SESSION_TTL_SECS` - Advertised checkout session lifetime (default: 1800)
//! - `API_RATE_LIMIT_ENABLED` - Rate limit cart and checkout endpoints (default: true)
//! - `CORS_ALLOWED_ORIGIN` - Browser origin allowed to call the API
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use artificial_wearables_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_API_URL: &str = "https://storefront-api.fourthwall.com";
const DEFAULT_CHECKOUT_DOMAIN: &str = "artificialwearables-shop.fourthwall.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Fourthwall Storefront API configuration
    pub fourthwall: FourthwallConfig,
    /// Checkout redirect configuration
    pub checkout: CheckoutConfig,
    /// Rate limit `/api/cart` and `/api/checkout`
    pub rate_limit_enabled: bool,
    /// Browser origin allowed by CORS (none = same-origin only)
    pub cors_allowed_origin: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Fourthwall Storefront API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct FourthwallConfig {
    /// API base URL, without the `/v1` suffix
    pub api_url: Url,
    /// Storefront API token, sent as the `storefront_token` query parameter
    pub storefront_token: SecretString,
    /// Currency requested for catalog prices
    pub currency: CurrencyCode,
    /// Per-request timeout
    pub timeout: Duration,
    /// Lifetime of cached products and collections
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for FourthwallConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FourthwallConfig")
            .field("api_url", &self.api_url.as_str())
            .field("storefront_token", &"[REDACTED]")
            .field("currency", &self.currency)
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Hosted checkout configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Shop-specific checkout domain (e.g., my-shop.fourthwall.com)
    pub domain: String,
    /// Currency passed to the hosted checkout
    pub currency: CurrencyCode,
    /// How long a generated checkout session is advertised as valid
    pub session_ttl: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the storefront token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let currency: CurrencyCode = parse_env("STOREFRONT_CURRENCY", "USD")?;

        let fourthwall = FourthwallConfig::from_env(currency)?;
        let checkout = CheckoutConfig {
            domain: get_env_or_default("FOURTHWALL_CHECKOUT_DOMAIN", DEFAULT_CHECKOUT_DOMAIN),
            currency,
            session_ttl: Duration::from_secs(parse_env("CHECKOUT_SESSION_TTL_SECS", "1800")?),
        };
        validate_domain(&checkout.domain, "FOURTHWALL_CHECKOUT_DOMAIN")?;

        Ok(Self {
            host,
            port,
            fourthwall,
            checkout,
            rate_limit_enabled: parse_env("API_RATE_LIMIT_ENABLED", "true")?,
            cors_allowed_origin: get_optional_env("CORS_ALLOWED_ORIGIN"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FourthwallConfig {
    fn from_env(currency: CurrencyCode) -> Result<Self, ConfigError> {
        let api_url = get_env_or_default("FOURTHWALL_API_URL", DEFAULT_API_URL);
        let api_url = Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidEnvVar("FOURTHWALL_API_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_url,
            storefront_token: get_validated_secret("FOURTHWALL_STOREFRONT_TOKEN")?,
            currency,
            timeout: Duration::from_secs(parse_env("FOURTHWALL_TIMEOUT_SECS", "10")?),
            cache_ttl: Duration::from_secs(parse_env("CATALOG_CACHE_TTL_SECS", "300")?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// A checkout domain is a bare host name: no scheme, path, or whitespace.
fn validate_domain(domain: &str, var_name: &str) -> Result<(), ConfigError> {
    let invalid = domain.is_empty()
        || domain.contains("://")
        || domain.contains('/')
        || domain.chars().any(char::is_whitespace);
    if invalid {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected a bare host name, got '{domain}'"),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real tokens are random UUIDs, so they clear this easily
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token from the Fourthwall dashboard."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fourthwall_config(token: &str) -> FourthwallConfig {
        FourthwallConfig {
            api_url: Url::parse("https://storefront-api.fourthwall.com").unwrap(),
            storefront_token: SecretString::from(token),
            currency: CurrencyCode::USD,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-storefront-token", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("ptkn_aaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_real_token_shape() {
        let result =
            validate_secret_strength("ptkn_3f9c2a71-8d4e-4b6a-9e15-c07d2b8f64a3", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_domain() {
        assert!(validate_domain("my-shop.fourthwall.com", "D").is_ok());
        assert!(validate_domain("https://my-shop.fourthwall.com", "D").is_err());
        assert!(validate_domain("my-shop.fourthwall.com/checkout", "D").is_err());
        assert!(validate_domain("", "D").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            fourthwall: fourthwall_config("ptkn_3f9c2a71-8d4e-4b6a-9e15-c07d2b8f64a3"),
            checkout: CheckoutConfig {
                domain: DEFAULT_CHECKOUT_DOMAIN.to_string(),
                currency: CurrencyCode::USD,
                session_ttl: Duration::from_secs(1800),
            },
            rate_limit_enabled: true,
            cors_allowed_origin: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_fourthwall_config_debug_redacts_token() {
        let config = fourthwall_config("ptkn_super_secret_token_value");
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("storefront-api.fourthwall.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("ptkn_super_secret_token_value"));
    }
}
