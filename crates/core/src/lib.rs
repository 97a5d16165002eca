//! Pocket Cart Core - Shared cart types.
//!
//! This crate provides the types used across all Pocket Cart components:
//! - `pocket-cart` - Cart store, catalog client and storage backends
//! - `pocket-cart-cli` - Command-line front-end for driving a cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, quantities, line items and cart state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
