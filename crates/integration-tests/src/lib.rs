//! Integration tests for Pocket Cart.
//!
//! The tests drive the real `CatalogClient` against an `httpmock` server
//! and persist carts with `FileStorage` in temporary directories, so no
//! external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_client` - HTTP contract of the catalog API client
//! - `cart_store` - Cart operations end to end, including reload from disk
