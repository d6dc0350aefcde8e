//! Domain models for the storefront.

pub mod session;

pub use session::{SessionUser, session_keys};
