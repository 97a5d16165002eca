//! Collaborator interfaces the cart store is built against.
//!
//! The store never talks to the network or the disk directly; it goes
//! through these traits so the HTTP client, storage backend and user
//! notification channel can be swapped (and faked in tests).

use std::future::Future;

use pocket_cart_core::{CartState, Product, ProductId};

use crate::catalog::LookupError;
use crate::error::CartError;
use crate::storage::StorageError;

/// Authority for remaining sellable units of a product.
pub trait StockOracle: Send + Sync {
    /// Units of `id` currently available.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<u32, LookupError>> + Send;
}

/// Source of product details for products not yet in the cart.
pub trait ProductLookup: Send + Sync {
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, LookupError>> + Send;
}

/// Durable storage holding one serialized cart.
pub trait CartStorage: Send + Sync {
    /// Read the stored cart, `None` if nothing has been saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<CartState>, StorageError>> + Send;

    /// Overwrite the stored cart.
    fn save(&self, state: &CartState) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// User-facing channel for rejected cart operations.
pub trait Notifier: Send + Sync {
    fn notify(&self, error: &CartError);
}

impl<T: StockOracle> StockOracle for std::sync::Arc<T> {
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<u32, LookupError>> + Send {
        (**self).stock(id)
    }
}

impl<T: ProductLookup> ProductLookup for std::sync::Arc<T> {
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, LookupError>> + Send {
        (**self).product(id)
    }
}

impl<T: CartStorage> CartStorage for std::sync::Arc<T> {
    fn load(&self) -> impl Future<Output = Result<Option<CartState>, StorageError>> + Send {
        (**self).load()
    }

    fn save(&self, state: &CartState) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).save(state)
    }
}
