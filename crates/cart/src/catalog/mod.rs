//! Product catalog and stock API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`
//! - The catalog service is the source of truth for stock - stock levels are
//!   fetched on every cart operation and never cached
//! - Product details are cached in memory via `moka` (5 minute TTL by default)
//!
//! # Endpoints
//!
//! - `GET {base}/stock/{id}` returns `{ "id": 1, "amount": 3 }`
//! - `GET {base}/products/{id}` returns `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_cart::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//! let available = client.get_stock(ProductId::new(1)).await?;
//! let product = client.get_product(ProductId::new(1)).await?;
//! ```

mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when looking up products or stock.
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: reqwest::StatusCode,
        /// Leading part of the response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}
