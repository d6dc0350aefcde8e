//! Auth service client.
//!
//! Login, registration, and token validation. Tokens are opaque strings
//! minted by the service; the storefront never inspects them.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use super::{ServiceError, base_str, read_json, read_ok};

/// Credentials sent to `/login` and `/register`.
#[derive(Debug, Serialize)]
struct Credentials<'a> {
    user_id: &'a str,
    password: &'a str,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Client for the auth service.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Create a new auth service client.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &Url) -> Self {
        Self {
            client,
            base_url: base_str(base_url),
        }
    }

    /// Authenticate and obtain a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    #[instrument(skip(self, password), fields(user_id = %user_id))]
    pub async fn login(&self, user_id: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        let url = format!("{}/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&Credentials { user_id, password })
            .send()
            .await?;
        read_json(response).await
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects the
    /// registration (e.g. duplicate user).
    #[instrument(skip(self, password), fields(user_id = %user_id))]
    pub async fn register(&self, user_id: &str, password: &str) -> Result<(), ServiceError> {
        let url = format!("{}/register", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&Credentials { user_id, password })
            .send()
            .await?;
        read_ok(response).await
    }

    /// Validate a bearer token. The service answers non-2xx for invalid or
    /// expired tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn validate_token(&self, token: &str) -> Result<(), ServiceError> {
        let url = format!("{}/validar-token", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;
        read_ok(response).await
    }
}
