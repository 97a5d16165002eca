//! Pocket Cart - stock-checked shopping cart store.
//!
//! Keeps the set of products a shopper intends to buy, refuses quantities
//! beyond what the catalog reports in stock, and persists the cart so it
//! survives restarts.
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_cart::{CartConfig, CartStore, CatalogClient, FileStorage};
//!
//! let config = CartConfig::from_env()?;
//! let catalog = CatalogClient::new(&config.catalog);
//! let store = CartStore::open(catalog, FileStorage::new(&config.data_dir)).await;
//!
//! store.add_product(ProductId::new(1)).await?;
//! store.set_quantity(ProductId::new(1), 3).await?;
//! println!("{}", store.summary().await.total);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod ports;
pub mod storage;
pub mod store;
pub mod telemetry;

pub use catalog::{CatalogClient, LookupError};
pub use config::{CartConfig, CatalogConfig, ConfigError};
pub use error::{CartError, CartFailure, CartOperation, Result};
pub use notify::TracingNotifier;
pub use ports::{CartStorage, Notifier, ProductLookup, StockOracle};
pub use storage::{CART_KEY, FileStorage, MemoryStorage, StorageError};
pub use store::CartStore;
