//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::StorefrontConfig;
use crate::services::{AuthClient, CatalogClient, PurchasesClient};

/// Error building the shared state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the three backend service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    auth: AuthClient,
    catalog: CatalogClient,
    purchases: PurchasesClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// One `reqwest::Client` (connection pool, timeout) is shared by all
    /// three service clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let auth = AuthClient::new(http.clone(), &config.services.auth_url);
        let catalog = CatalogClient::new(
            http.clone(),
            &config.services.catalog_url,
            &config.tenant_id,
        );
        let purchases = PurchasesClient::new(
            http,
            &config.services.purchases_url,
            &config.tenant_id,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                catalog,
                purchases,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the auth service client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the catalog service client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the purchases service client.
    #[must_use]
    pub fn purchases(&self) -> &PurchasesClient {
        &self.inner.purchases
    }
}
