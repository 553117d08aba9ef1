//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::fourthwall::{FourthwallClient, FourthwallError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The storefront keeps no
/// state of its own beyond configuration and the upstream client cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    fourthwall: FourthwallClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Fourthwall HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, FourthwallError> {
        let fourthwall = FourthwallClient::new(&config.fourthwall)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, fourthwall }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Fourthwall Storefront API client.
    #[must_use]
    pub fn fourthwall(&self) -> &FourthwallClient {
        &self.inner.fourthwall
    }
}
