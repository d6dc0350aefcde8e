//! Botica Core - Shared types library.
//!
//! This crate provides common types used by the Botica storefront:
//! products, purchases, and the client-side shopping cart.
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. Wire-facing structs carry `serde` renames that match the field
//! names of the remote backend services, so they can be used directly in
//! requests and responses.
//!
//! # Modules
//!
//! - [`types`] - Product and purchase types shared with the backends
//! - [`cart`] - In-memory shopping cart with quantity-merge semantics

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartItem};
pub use types::*;
