//! Product catalog service client.
//!
//! Listing, creation/update, point lookup, deletion, and the image upload
//! URL. The full product list is cached briefly with `moka` and
//! invalidated by every mutation, since search and autocomplete re-read it
//! on each keystroke.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use botica_core::Product;

use super::{ServiceError, base_str, read_json, read_ok};

/// How long a fetched product list stays fresh.
const LIST_CACHE_TTL: Duration = Duration::from_secs(30);

/// Fields accepted by the create/update endpoint. Including `sku` turns
/// the call into an update of that record.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "activeIngredient")]
    pub active_ingredient: String,
    #[serde(rename = "dosageForm")]
    pub dosage_form: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "expirationDate")]
    pub expiration_date: String,
    #[serde(rename = "prescriptionRequired")]
    pub prescription_required: bool,
}

/// Create/update request body: tenant and token alongside the draft fields.
#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    tenant_id: &'a str,
    token: &'a str,
    #[serde(flatten)]
    draft: &'a ProductDraft,
}

/// List request body.
#[derive(Debug, Serialize)]
struct ListRequest<'a> {
    tenant_id: &'a str,
    token: &'a str,
}

/// Shapes the list endpoint has been observed to answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody {
    Items { items: Vec<Product> },
    Productos { productos: Vec<Product> },
    Bare(Vec<Product>),
}

impl ListBody {
    fn into_products(self) -> Vec<Product> {
        match self {
            Self::Items { items } => items,
            Self::Productos { productos } => productos,
            Self::Bare(products) => products,
        }
    }
}

/// Upload URL response, under either of the two observed field names.
#[derive(Debug, Deserialize)]
struct UploadUrlBody {
    #[serde(rename = "uploadUrl")]
    upload_url: Option<String>,
    url: Option<String>,
}

/// Client for the product catalog service.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    tenant_id: String,
    list_cache: Cache<String, Vec<Product>>,
}

impl CatalogClient {
    /// Create a new catalog service client.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &Url, tenant_id: &str) -> Self {
        let list_cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(LIST_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: base_str(base_url),
                tenant_id: tenant_id.to_string(),
                list_cache,
            }),
        }
    }

    /// The tenant this client is scoped to.
    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.inner.tenant_id
    }

    fn list_cache_key(&self) -> String {
        format!("productos:{}", self.inner.tenant_id)
    }

    /// List all products for the tenant.
    ///
    /// Served from the cache when fresh; mutations invalidate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, token))]
    pub async fn list_products(&self, token: &str) -> Result<Vec<Product>, ServiceError> {
        let cache_key = self.list_cache_key();
        if let Some(products) = self.inner.list_cache.get(&cache_key).await {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let url = format!("{}/productos/listar", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .json(&ListRequest {
                tenant_id: &self.inner.tenant_id,
                token,
            })
            .send()
            .await?;

        let body: ListBody = read_json(response).await?;
        let products = body.into_products();

        self.inner
            .list_cache
            .insert(cache_key, products.clone())
            .await;

        Ok(products)
    }

    /// Create a product, or update one when the draft carries a SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, token, draft), fields(sku = ?draft.sku, name = %draft.name))]
    pub async fn save_product(
        &self,
        token: &str,
        draft: &ProductDraft,
    ) -> Result<Product, ServiceError> {
        let url = format!("{}/productos", self.inner.base_url);
        let response = self
            .inner
            .client
            .post(&url)
            .json(&SaveRequest {
                tenant_id: &self.inner.tenant_id,
                token,
                draft,
            })
            .send()
            .await?;

        let product = read_json(response).await?;
        self.inner.list_cache.invalidate(&self.list_cache_key()).await;
        Ok(product)
    }

    /// Fetch one product by SKU. A 404 maps to `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than a 404 rejection.
    #[instrument(skip(self, token), fields(sku = %sku))]
    pub async fn get_product(
        &self,
        token: &str,
        sku: &str,
    ) -> Result<Option<Product>, ServiceError> {
        let url = format!(
            "{}/productos/{}/{}",
            self.inner.base_url,
            self.inner.tenant_id,
            urlencoding::encode(sku)
        );
        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        match read_json(response).await {
            Ok(product) => Ok(Some(product)),
            Err(e) if e.is_status(404) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a product by SKU. The service expects the token and tenant
    /// in a JSON body on the DELETE request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, token), fields(sku = %sku))]
    pub async fn delete_product(&self, token: &str, sku: &str) -> Result<(), ServiceError> {
        let url = format!(
            "{}/productos/{}/{}",
            self.inner.base_url,
            self.inner.tenant_id,
            urlencoding::encode(sku)
        );
        let response = self
            .inner
            .client
            .delete(&url)
            .json(&serde_json::json!({
                "token": token,
                "tenant_id": self.inner.tenant_id,
            }))
            .send()
            .await?;

        read_ok(response).await?;
        self.inner.list_cache.invalidate(&self.list_cache_key()).await;
        Ok(())
    }

    /// Obtain a pre-signed target URL for image uploads.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or neither known field is
    /// present in the response.
    #[instrument(skip(self, token))]
    pub async fn upload_url(&self, token: &str) -> Result<String, ServiceError> {
        let url = format!("{}/productos/upload-url", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        let body: UploadUrlBody = read_json(response).await?;
        body.upload_url
            .or(body.url)
            .ok_or_else(|| ServiceError::Malformed("no upload URL in response".to_string()))
    }

    /// Drop the cached product list.
    pub async fn invalidate_list(&self) {
        self.inner.list_cache.invalidate(&self.list_cache_key()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_body_accepts_items_shape() {
        let body: ListBody =
            serde_json::from_str(r#"{"items": [{"nombre": "Aspirina"}]}"#).expect("items shape");
        assert_eq!(body.into_products().len(), 1);
    }

    #[test]
    fn list_body_accepts_productos_shape() {
        let body: ListBody = serde_json::from_str(r#"{"productos": [{"nombre": "Aspirina"}]}"#)
            .expect("productos shape");
        assert_eq!(body.into_products().len(), 1);
    }

    #[test]
    fn list_body_accepts_bare_array() {
        let body: ListBody =
            serde_json::from_str(r#"[{"nombre": "Aspirina"}, {"nombre": "Paracetamol"}]"#)
                .expect("bare array");
        assert_eq!(body.into_products().len(), 2);
    }

    #[test]
    fn save_request_flattens_draft_and_omits_missing_sku() {
        let draft = ProductDraft {
            sku: None,
            name: "Aspirina".to_string(),
            active_ingredient: "Ácido acetilsalicílico".to_string(),
            dosage_form: "tableta".to_string(),
            price: 12.5,
            expiration_date: "2027-01-31".to_string(),
            prescription_required: false,
        };
        let request = SaveRequest {
            tenant_id: "inkafarma",
            token: "tok",
            draft: &draft,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["tenant_id"], "inkafarma");
        assert_eq!(value["nombre"], "Aspirina");
        assert_eq!(value["precio"], 12.5);
        assert!(value.get("sku").is_none());
    }
}
