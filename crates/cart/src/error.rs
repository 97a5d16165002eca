//! Cart operation errors.
//!
//! Every cart operation returns `Result<(), CartError>`. Errors are
//! recoverable: a rejected operation leaves both the in-memory cart and the
//! stored cart exactly as they were.

use core::fmt;

use pocket_cart_core::{CartStateError, ProductId};
use thiserror::Error;

use crate::catalog::LookupError;
use crate::storage::StorageError;

/// The cart operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    /// Adding one unit of a product.
    Add,
    /// Removing a product's line.
    Remove,
    /// Changing a line's quantity.
    Update,
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "addition",
            Self::Remove => "removal",
            Self::Update => "update",
        })
    }
}

/// A collaborator failure underneath a cart operation.
#[derive(Debug, Error)]
pub enum CartFailure {
    /// Stock or product lookup failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Persisting the cart failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The resulting cart is not valid, e.g. its total overflows.
    #[error(transparent)]
    State(#[from] CartStateError),
}

/// Cart-level error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested total quantity exceeds available stock.
    #[error("requested {requested} of product {product_id}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The product has no line in the cart.
    #[error("product {product_id} is not in the cart ({operation} failed)")]
    ItemNotFound {
        product_id: ProductId,
        operation: CartOperation,
    },

    /// A lookup, persistence or cart validity failure.
    #[error("product {operation} failed: {source}")]
    OperationFailed {
        operation: CartOperation,
        #[source]
        source: CartFailure,
    },
}

impl CartError {
    pub(crate) fn failed(operation: CartOperation, source: impl Into<CartFailure>) -> Self {
        Self::OperationFailed {
            operation,
            source: source.into(),
        }
    }

    /// The operation that was rejected, if known.
    #[must_use]
    pub const fn operation(&self) -> Option<CartOperation> {
        match self {
            Self::OutOfStock { .. } => None,
            Self::ItemNotFound { operation, .. } | Self::OperationFailed { operation, .. } => {
                Some(*operation)
            }
        }
    }

    /// Message suitable for showing to a shopper.
    ///
    /// Internal details (HTTP status, IO errors) are not exposed.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::OutOfStock { .. } => "Requested quantity is out of stock",
            Self::ItemNotFound { operation, .. } | Self::OperationFailed { operation, .. } => {
                match operation {
                    CartOperation::Add => "Error adding product",
                    CartOperation::Remove => "Error removing product",
                    CartOperation::Update => "Error updating product quantity",
                }
            }
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
