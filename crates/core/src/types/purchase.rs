//! Purchase ledger types.
//!
//! Purchases are created and owned by the remote purchase service; the
//! storefront only reads and displays them.

use serde::{Deserialize, Serialize};

/// One product line inside a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Purchase lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
    /// Unrecognized status from the backend.
    #[serde(other)]
    Unknown,
}

impl PurchaseStatus {
    /// Spanish display label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::Completed => "Completada",
            Self::Cancelled => "Cancelada",
            Self::Unknown => "Desconocido",
        }
    }
}

/// A purchase as served by the purchase service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(rename = "compra_id")]
    pub id: String,

    pub user_id: String,

    #[serde(default)]
    pub products: Vec<PurchaseItem>,

    #[serde(default)]
    pub total: f64,

    /// Purchase timestamp as the backend formats it.
    #[serde(rename = "fecha", default)]
    pub date: String,

    #[serde(default)]
    pub status: PurchaseStatus,
}

impl Purchase {
    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.products.iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_purchase() {
        let json = r#"{
            "compra_id": "c-001",
            "user_id": "ana@example.com",
            "products": [
                {"product_id": "ASP-100", "name": "Aspirina", "quantity": 2, "price": 12.5}
            ],
            "total": 25.0,
            "fecha": "2026-08-01T12:00:00Z",
            "status": "completed"
        }"#;

        let purchase: Purchase = serde_json::from_str(json).expect("valid purchase");
        assert_eq!(purchase.id, "c-001");
        assert_eq!(purchase.status, PurchaseStatus::Completed);
        assert_eq!(purchase.unit_count(), 2);
        assert!((purchase.total - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_status_does_not_fail_parsing() {
        let json = r#"{"compra_id": "c-002", "user_id": "u", "status": "shipped"}"#;
        let purchase: Purchase = serde_json::from_str(json).expect("valid purchase");
        assert_eq!(purchase.status, PurchaseStatus::Unknown);
    }

    #[test]
    fn status_defaults_to_pending_when_absent() {
        let json = r#"{"compra_id": "c-003", "user_id": "u"}"#;
        let purchase: Purchase = serde_json::from_str(json).expect("valid purchase");
        assert_eq!(purchase.status, PurchaseStatus::Pending);
    }
}
