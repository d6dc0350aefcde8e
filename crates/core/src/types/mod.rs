//! Core types for Botica.
//!
//! Wire-accurate representations of the entities served by the remote
//! auth, catalog, and purchase services.

pub mod product;
pub mod purchase;

pub use product::Product;
pub use purchase::{Purchase, PurchaseItem, PurchaseStatus};
