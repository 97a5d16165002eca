//! Catalog product data.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as described by the catalog.
///
/// Only the fields the cart keeps on its lines are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
}
