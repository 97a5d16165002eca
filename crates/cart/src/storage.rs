//! Cart persistence backends.
//!
//! Both backends are plain key-value stores of strings; the cart is kept as
//! a JSON array of line items under [`CART_KEY`]. Every save overwrites the
//! whole cart.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pocket_cart_core::CartState;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::ports::CartStorage;

/// Key the cart is stored under.
pub const CART_KEY: &str = "pocket-cart.cart";

/// Errors that can occur when reading or writing the stored cart.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Stored data is not a valid cart.
    #[error("Corrupt cart data: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// Cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn decode(raw: &str) -> Result<CartState, StorageError> {
    serde_json::from_str(raw).map_err(StorageError::Corrupt)
}

fn encode(state: &CartState) -> Result<String, StorageError> {
    serde_json::to_string(state).map_err(StorageError::Serialize)
}

// =============================================================================
// FileStorage
// =============================================================================

/// Stores the cart as a JSON file inside a data directory.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash mid-write leaves the previous cart intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{CART_KEY}.json")),
        }
    }

    /// Path of the cart file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for FileStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<CartState>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored cart");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        decode(&raw).map(Some)
    }

    #[instrument(skip(self, state), fields(path = %self.path.display(), lines = state.len()))]
    async fn save(&self, state: &CartState) -> Result<(), StorageError> {
        let data = encode(state)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Cart saved");
        Ok(())
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process key-value storage.
///
/// Cheap to clone; clones share the same map. Useful for tests and for
/// sessions that should not outlive the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value for `key`.
    pub async fn get_raw(&self, key: &str) -> Option<String> {
        self.data.lock().await.get(key).cloned()
    }

    /// Store a raw value under `key`, bypassing serialization.
    pub async fn put_raw(&self, key: &str, value: impl Into<String>) {
        self.data.lock().await.insert(key.to_string(), value.into());
    }
}

impl CartStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<CartState>, StorageError> {
        self.get_raw(CART_KEY)
            .await
            .map(|raw| decode(&raw))
            .transpose()
    }

    async fn save(&self, state: &CartState) -> Result<(), StorageError> {
        let data = encode(state)?;
        self.put_raw(CART_KEY, data).await;
        Ok(())
    }
}
