//! Product catalog types.
//!
//! Field names on the wire are Spanish (`nombre`, `precio`) or camelCase
//! (`activeIngredient`), matching the catalog service exactly. The Rust
//! field names are normalized English.

use serde::{Deserialize, Serialize};

/// A pharmacy product as served by the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stock-keeping unit, the preferred identifier. Absent on some
    /// legacy records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Legacy identifier predating SKUs.
    #[serde(rename = "producto_id", default, skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,

    /// Catalog partition the product belongs to.
    #[serde(default)]
    pub tenant_id: String,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "activeIngredient", default)]
    pub active_ingredient: String,

    #[serde(rename = "dosageForm", default)]
    pub dosage_form: String,

    #[serde(rename = "precio", default)]
    pub price: f64,

    /// Expiration date as the backend formats it (ISO date string).
    #[serde(rename = "expirationDate", default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    #[serde(rename = "prescriptionRequired", default)]
    pub prescription_required: bool,

    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Product {
    /// Resolved product identity: SKU if present, else the legacy id,
    /// else the name.
    ///
    /// The backend gives no uniqueness guarantee when both identifiers are
    /// absent; two distinct products sharing a name would collide here.
    /// The fallback chain is kept as the backends define it.
    #[must_use]
    pub fn key(&self) -> &str {
        self.sku
            .as_deref()
            .or(self.legacy_id.as_deref())
            .unwrap_or(&self.name)
    }
}
