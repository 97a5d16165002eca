//! Core types for Pocket Cart.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod quantity;

pub use cart::{CartState, CartStateError, CartSummary, LineItem, LineSummary};
pub use id::*;
pub use price::Price;
pub use product::Product;
pub use quantity::{Quantity, QuantityError};
