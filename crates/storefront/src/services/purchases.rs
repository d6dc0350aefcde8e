//! Purchase ledger service client.
//!
//! Registers checkouts and lists the purchase history for the current
//! user. Purchases are created server-side; the storefront only submits
//! the cart snapshot and reads the result.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use botica_core::{Purchase, PurchaseItem};

use super::{ServiceError, base_str, read_json};

/// Checkout request body.
#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    token: &'a str,
    tenant_id: &'a str,
    user_id: &'a str,
    products: &'a [PurchaseItem],
    total: f64,
}

/// List request body.
#[derive(Debug, Serialize)]
struct ListRequest<'a> {
    token: &'a str,
    tenant_id: &'a str,
}

/// Shapes the list endpoint answers with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody {
    Compras { compras: Vec<Purchase> },
    Bare(Vec<Purchase>),
}

impl ListBody {
    fn into_purchases(self) -> Vec<Purchase> {
        match self {
            Self::Compras { compras } => compras,
            Self::Bare(purchases) => purchases,
        }
    }
}

/// Client for the purchase ledger service.
#[derive(Clone)]
pub struct PurchasesClient {
    client: reqwest::Client,
    base_url: String,
    tenant_id: String,
}

impl PurchasesClient {
    /// Create a new purchases service client.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &Url, tenant_id: &str) -> Self {
        Self {
            client,
            base_url: base_str(base_url),
            tenant_id: tenant_id.to_string(),
        }
    }

    /// Register a purchase from a cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected. The caller
    /// must leave its cart untouched in that case.
    #[instrument(skip(self, token, products), fields(user_id = %user_id, total = %total))]
    pub async fn register_purchase(
        &self,
        token: &str,
        user_id: &str,
        products: &[PurchaseItem],
        total: f64,
    ) -> Result<Purchase, ServiceError> {
        let url = format!("{}/compras/registrar-compra", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RegisterRequest {
                token,
                tenant_id: &self.tenant_id,
                user_id,
                products,
                total,
            })
            .send()
            .await?;

        read_json(response).await
    }

    /// List purchases for the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, token))]
    pub async fn list_purchases(&self, token: &str) -> Result<Vec<Purchase>, ServiceError> {
        let url = format!("{}/compras/listar-compras", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ListRequest {
                token,
                tenant_id: &self.tenant_id,
            })
            .send()
            .await?;

        let body: ListBody = read_json(response).await?;
        Ok(body.into_purchases())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_body_accepts_compras_shape() {
        let json = r#"{"compras": [{"compra_id": "c-1", "user_id": "ana"}]}"#;
        let body: ListBody = serde_json::from_str(json).expect("compras shape");
        assert_eq!(body.into_purchases().len(), 1);
    }

    #[test]
    fn list_body_accepts_bare_array() {
        let json = r#"[{"compra_id": "c-1", "user_id": "ana"}]"#;
        let body: ListBody = serde_json::from_str(json).expect("bare array");
        assert_eq!(body.into_purchases().len(), 1);
    }

    #[test]
    fn register_request_carries_tenant_and_totals() {
        let items = vec![PurchaseItem {
            product_id: "ASP-100".to_string(),
            name: "Aspirina".to_string(),
            quantity: 2,
            price: 12.5,
        }];
        let request = RegisterRequest {
            token: "tok",
            tenant_id: "inkafarma",
            user_id: "ana",
            products: &items,
            total: 25.0,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["tenant_id"], "inkafarma");
        assert_eq!(value["products"][0]["product_id"], "ASP-100");
        assert_eq!(value["total"], 25.0);
    }
}
