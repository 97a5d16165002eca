//! Cart line items and cart state.
//!
//! [`CartState`] is an immutable value: every change produces a new state,
//! which lets the store validate a prospective cart in full before committing
//! it anywhere.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId, Quantity};

/// One product entry in the cart with its chosen quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Price,
    pub image_ref: String,
    pub quantity: Quantity,
}

impl LineItem {
    /// A new line holding a single unit of `product`.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        Self {
            product_id: product.id,
            title: product.title,
            unit_price: product.price,
            image_ref: product.image,
            quantity: Quantity::ONE,
        }
    }

    /// The same line with a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: Quantity) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// `unit_price × quantity`, or `None` if it is not representable.
    #[must_use]
    pub fn checked_subtotal(&self) -> Option<Price> {
        self.unit_price.checked_times(self.quantity.get())
    }
}

/// Errors that can occur when building a [`CartState`] from raw lines.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartStateError {
    /// Two lines reference the same product.
    #[error("duplicate line for product {0}")]
    DuplicateProduct(ProductId),

    /// A line subtotal or the cart total does not fit in a [`Price`].
    #[error("cart total is out of range")]
    TotalOverflow,
}

/// The full ordered set of line items at an instant.
///
/// Lines keep insertion order. At most one line exists per product.
/// Deserialized carts are also guaranteed to have a representable total;
/// carts built with the `with_*` methods are checked with
/// [`CartState::checked_summary`] before the store commits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from lines, enforcing one line per product.
    ///
    /// # Errors
    ///
    /// - [`CartStateError::DuplicateProduct`] if two lines share a product
    /// - [`CartStateError::TotalOverflow`] if the total is not representable
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartStateError> {
        for (i, item) in items.iter().enumerate() {
            if items
                .iter()
                .skip(i + 1)
                .any(|other| other.product_id == item.product_id)
            {
                return Err(CartStateError::DuplicateProduct(item.product_id));
            }
        }
        let state = Self { items };
        state.checked_summary()?;
        Ok(state)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Units of `product_id` in the cart, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.quantity.get())
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A new state with `item` inserted.
    ///
    /// Replaces the existing line for the same product in place, otherwise
    /// appends.
    #[must_use]
    pub fn with_line(&self, item: LineItem) -> Self {
        let mut items = self.items.clone();
        match items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Self { items }
    }

    /// A new state with the quantity of `product_id` replaced.
    ///
    /// Returns `None` if the product has no line.
    #[must_use]
    pub fn with_quantity(&self, product_id: ProductId, quantity: Quantity) -> Option<Self> {
        let line = self.get(product_id)?.with_quantity(quantity);
        Some(self.with_line(line))
    }

    /// A new state without the line for `product_id`.
    ///
    /// Returns `None` if the product has no line.
    #[must_use]
    pub fn without(&self, product_id: ProductId) -> Option<Self> {
        self.get(product_id)?;
        let items = self
            .items
            .iter()
            .filter(|item| item.product_id != product_id)
            .cloned()
            .collect();
        Some(Self { items })
    }

    /// Totals for display.
    ///
    /// Amounts saturate instead of overflowing; a cart that passed
    /// [`CartState::checked_summary`] never reaches that point.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let lines: Vec<LineSummary> = self
            .items
            .iter()
            .map(|item| LineSummary {
                product_id: item.product_id,
                subtotal: item.unit_price.saturating_times(item.quantity.get()),
            })
            .collect();
        let total = lines
            .iter()
            .fold(Price::ZERO, |total, line| total.saturating_add(line.subtotal));

        CartSummary {
            lines,
            total,
            item_count: self.item_count(),
        }
    }

    /// Totals computed exactly.
    ///
    /// # Errors
    ///
    /// Returns [`CartStateError::TotalOverflow`] if a subtotal or the total
    /// does not fit in a [`Price`].
    pub fn checked_summary(&self) -> Result<CartSummary, CartStateError> {
        let mut lines = Vec::with_capacity(self.items.len());
        let mut total = Price::ZERO;
        for item in &self.items {
            let subtotal = item
                .checked_subtotal()
                .ok_or(CartStateError::TotalOverflow)?;
            total = total
                .checked_add(subtotal)
                .ok_or(CartStateError::TotalOverflow)?;
            lines.push(LineSummary {
                product_id: item.product_id,
                subtotal,
            });
        }

        Ok(CartSummary {
            lines,
            total,
            item_count: self.item_count(),
        })
    }

    fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }
}

impl TryFrom<Vec<LineItem>> for CartState {
    type Error = CartStateError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<CartState> for Vec<LineItem> {
    fn from(state: CartState) -> Self {
        state.items
    }
}

impl<'a> IntoIterator for &'a CartState {
    type Item = &'a LineItem;
    type IntoIter = core::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Subtotal of one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSummary {
    pub product_id: ProductId,
    pub subtotal: Price,
}

/// Derived totals of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Per-line subtotals, in cart order.
    pub lines: Vec<LineSummary>,
    /// Sum of all line subtotals.
    pub total: Price,
    /// Sum of all quantities.
    pub item_count: u64,
}
