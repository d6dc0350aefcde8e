//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AUTH_API_URL` - Base URL of the auth service
//! - `CATALOG_API_URL` - Base URL of the product catalog service
//! - `PURCHASES_API_URL` - Base URL of the purchase ledger service
//!
//! ## Optional
//! - `BOTICA_HOST` - Bind address (default: 127.0.0.1)
//! - `BOTICA_PORT` - Listen port (default: 3000)
//! - `BOTICA_BASE_URL` - Public URL of the storefront (default: http://localhost:3000)
//! - `BOTICA_TENANT` - Catalog tenant id (default: inkafarma)
//! - `BOTICA_HTTP_TIMEOUT_SECS` - Per-request timeout for service calls (default: 10)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

/// Default catalog partition. Every catalog and purchase call carries it.
const DEFAULT_TENANT: &str = "inkafarma";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog tenant id sent with every catalog/purchase call
    pub tenant_id: String,
    /// Per-request timeout for outbound service calls, in seconds
    pub http_timeout_secs: u64,
    /// Remote backend service endpoints
    pub services: ServiceEndpoints,
}

/// Base URLs of the three remote backend services.
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    pub auth_url: Url,
    pub catalog_url: Url,
    pub purchases_url: Url,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("BOTICA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BOTICA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BOTICA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BOTICA_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("BOTICA_BASE_URL", "http://localhost:3000");
        let tenant_id = get_env_or_default("BOTICA_TENANT", DEFAULT_TENANT);
        let http_timeout_secs = get_env_or_default("BOTICA_HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BOTICA_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let services = ServiceEndpoints::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            tenant_id,
            http_timeout_secs,
            services,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ServiceEndpoints {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            auth_url: get_required_url("AUTH_API_URL")?,
            catalog_url: get_required_url("CATALOG_API_URL")?,
            purchases_url: get_required_url("PURCHASES_API_URL")?,
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

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required environment variable parsed as a URL.
fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    let raw = get_required_env(key)?;
    Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
