//! The cart store.
//!
//! [`CartStore`] owns the shopper's cart. Every mutation follows the same
//! check-then-commit shape:
//!
//! 1. take the store's writer lock
//! 2. read the current [`CartState`] and fetch a fresh stock level
//! 3. build the prospective next state and validate it against stock
//! 4. save the next state, then swap it into memory
//!
//! A failure at any step returns before step 4 completes, so the in-memory
//! cart and the stored cart never diverge and a rejected operation has no
//! partial effects. Holding the writer lock from step 2 to step 4 means two
//! concurrent operations (a double click) are applied one after the other
//! instead of the second silently overwriting the first.

use std::sync::Arc;

use pocket_cart_core::{CartState, CartSummary, LineItem, ProductId, Quantity};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::error::{CartError, CartOperation, Result};
use crate::notify::TracingNotifier;
use crate::ports::{CartStorage, Notifier, ProductLookup, StockOracle};

/// Target of a quantity change.
#[derive(Debug, Clone, Copy)]
enum QuantityChange {
    /// Set the line to exactly this many units.
    Exact(i64),
    /// Move the line's current quantity by this many units.
    Delta(i64),
}

/// Shopping cart with stock-checked mutations and durable persistence.
///
/// Cheap to clone; clones are handles to the same cart. Construct one per
/// session with [`CartStore::open`] and pass it to whatever needs the cart.
pub struct CartStore<C, S> {
    inner: Arc<CartStoreInner<C, S>>,
}

struct CartStoreInner<C, S> {
    catalog: C,
    storage: S,
    notifier: Box<dyn Notifier>,
    /// Committed cart, readable while a mutation waits on the network.
    state: RwLock<CartState>,
    /// Serializes mutations.
    writer: Mutex<()>,
}

impl<C, S> Clone for CartStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, S> CartStore<C, S>
where
    C: StockOracle + ProductLookup,
    S: CartStorage,
{
    /// Open the cart saved in `storage`, reporting rejected operations
    /// through [`TracingNotifier`].
    ///
    /// Starts empty if nothing was saved or the saved cart cannot be read;
    /// the unreadable data is left in place until the next successful save
    /// overwrites it.
    pub async fn open(catalog: C, storage: S) -> Self {
        Self::open_with_notifier(catalog, storage, TracingNotifier).await
    }

    /// Open the cart saved in `storage`, reporting rejected operations to
    /// `notifier`.
    ///
    /// Loading behaves as in [`CartStore::open`].
    #[instrument(skip_all)]
    pub async fn open_with_notifier(
        catalog: C,
        storage: S,
        notifier: impl Notifier + 'static,
    ) -> Self {
        let state = match storage.load().await {
            Ok(Some(state)) => {
                info!(lines = state.len(), "Restored saved cart");
                state
            }
            Ok(None) => {
                debug!("No saved cart, starting empty");
                CartState::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load saved cart, starting empty");
                CartState::new()
            }
        };

        Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                storage,
                notifier: Box::new(notifier),
                state: RwLock::new(state),
                writer: Mutex::new(()),
            }),
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Snapshot of the cart's lines in insertion order.
    pub async fn items(&self) -> CartState {
        self.inner.state.read().await.clone()
    }

    /// Line subtotals, total and item count of the current cart.
    pub async fn summary(&self) -> CartSummary {
        self.inner.state.read().await.summary()
    }

    /// Units of `product_id` currently in the cart, zero if absent.
    pub async fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.inner.state.read().await.quantity_of(product_id)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// A product already in the cart gets its quantity incremented; a new
    /// product is looked up and appended with quantity 1.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] if one more unit exceeds available stock
    /// - [`CartError::OperationFailed`] if a lookup or the save fails
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<()> {
        let result = self.try_add(product_id).await;
        self.report(result)
    }

    /// Remove a product's line from the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemNotFound`] if the product is not in the cart
    /// - [`CartError::OperationFailed`] if the save fails
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<()> {
        let result = self.try_remove(product_id).await;
        self.report(result)
    }

    /// Set a line's quantity.
    ///
    /// A `quantity` of zero or less does nothing and succeeds; use
    /// [`CartStore::remove_product`] to drop a line.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] if `quantity` exceeds available stock
    /// - [`CartError::ItemNotFound`] if the product is not in the cart
    /// - [`CartError::OperationFailed`] if the stock lookup or the save fails
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn set_quantity(&self, product_id: ProductId, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            debug!(quantity, "Non-positive quantity requested, ignoring");
            return Ok(());
        }
        let result = self
            .try_change_quantity(product_id, QuantityChange::Exact(quantity))
            .await;
        self.report(result)
    }

    /// Raise a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::set_quantity`].
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn increment(&self, product_id: ProductId) -> Result<()> {
        let result = self
            .try_change_quantity(product_id, QuantityChange::Delta(1))
            .await;
        self.report(result)
    }

    /// Lower a line's quantity by one. Does nothing at quantity 1.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::set_quantity`].
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn decrement(&self, product_id: ProductId) -> Result<()> {
        let result = self
            .try_change_quantity(product_id, QuantityChange::Delta(-1))
            .await;
        self.report(result)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn try_add(&self, product_id: ProductId) -> Result<()> {
        const OP: CartOperation = CartOperation::Add;

        let _writer = self.inner.writer.lock().await;
        let current = self.items().await;

        let available = self
            .inner
            .catalog
            .stock(product_id)
            .await
            .map_err(|e| CartError::failed(OP, e))?;

        let existing = current.get(product_id);
        let requested = u64::from(existing.map_or(0, |line| line.quantity.get())) + 1;
        if requested > u64::from(available) {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available,
            });
        }

        let next = match existing {
            Some(line) => current.with_line(line.with_quantity(line.quantity.incremented())),
            None => {
                let product = self
                    .inner
                    .catalog
                    .product(product_id)
                    .await
                    .map_err(|e| CartError::failed(OP, e))?;
                // The line is keyed by the id the caller asked for
                current.with_line(LineItem {
                    product_id,
                    ..LineItem::from_product(product)
                })
            }
        };

        self.commit(OP, next).await?;
        info!(quantity = requested, "Product added to cart");
        Ok(())
    }

    async fn try_remove(&self, product_id: ProductId) -> Result<()> {
        const OP: CartOperation = CartOperation::Remove;

        let _writer = self.inner.writer.lock().await;
        let current = self.items().await;

        let next = current.without(product_id).ok_or(CartError::ItemNotFound {
            product_id,
            operation: OP,
        })?;

        self.commit(OP, next).await?;
        info!("Product removed from cart");
        Ok(())
    }

    async fn try_change_quantity(
        &self,
        product_id: ProductId,
        change: QuantityChange,
    ) -> Result<()> {
        const OP: CartOperation = CartOperation::Update;
        let not_found = CartError::ItemNotFound {
            product_id,
            operation: OP,
        };

        let _writer = self.inner.writer.lock().await;
        let current = self.items().await;

        let quantity = match change {
            QuantityChange::Exact(quantity) => quantity,
            QuantityChange::Delta(delta) => {
                let line = current.get(product_id).ok_or(not_found)?;
                i64::from(line.quantity.get()) + delta
            }
        };
        if quantity <= 0 {
            debug!(quantity, "Quantity would drop below one, ignoring");
            return Ok(());
        }

        let available = self
            .inner
            .catalog
            .stock(product_id)
            .await
            .map_err(|e| CartError::failed(OP, e))?;

        let target = Quantity::try_from(quantity)
            .ok()
            .filter(|target| target.get() <= available)
            .ok_or(CartError::OutOfStock {
                product_id,
                requested: quantity.unsigned_abs(),
                available,
            })?;

        let next = current
            .with_quantity(product_id, target)
            .ok_or(CartError::ItemNotFound {
                product_id,
                operation: OP,
            })?;

        self.commit(OP, next).await?;
        info!(quantity = target.get(), "Cart quantity updated");
        Ok(())
    }

    /// Persist `next`, then make it the in-memory cart.
    ///
    /// A cart whose total cannot be represented is never stored, so reading
    /// the committed cart's totals is always exact.
    async fn commit(&self, operation: CartOperation, next: CartState) -> Result<()> {
        next.checked_summary()
            .map_err(|e| CartError::failed(operation, e))?;
        self.inner
            .storage
            .save(&next)
            .await
            .map_err(|e| CartError::failed(operation, e))?;
        *self.inner.state.write().await = next;
        Ok(())
    }

    /// Hand a rejected operation to the notifier before returning it.
    fn report(&self, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            self.inner.notifier.notify(e);
        }
        result
    }
}
