//! End-to-end cart tests.
//!
//! A `CartStore` wired to the real `CatalogClient` (against an `httpmock`
//! server) and to `FileStorage` in a temporary directory.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use httpmock::prelude::*;
use pocket_cart::{CartError, CartStore, CatalogClient, CatalogConfig, FileStorage, Notifier};
use pocket_cart_core::{Price, ProductId};
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;

/// Collects the shopper-facing messages of rejected operations.
#[derive(Clone, Default)]
struct Messages(Arc<Mutex<Vec<String>>>);

impl Messages {
    fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for Messages {
    fn notify(&self, error: &CartError) {
        self.0.lock().unwrap().push(error.user_message().to_string());
    }
}

/// Catalog with two products: 1 (two in stock) and 2 (sold out).
async fn catalog_server() -> MockServer {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/1");
            then.status(200).json_body(json!({"id": 1, "amount": 2}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/2");
            then.status(200).json_body(json!({"id": 2, "amount": 0}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products/1");
            then.status(200).json_body(json!({
                "id": 1,
                "title": "Tênis de Caminhada Leve Confortável",
                "price": "179.90",
                "image": "https://cdn.example.com/tenis.jpg"
            }));
        })
        .await;

    server
}

fn catalog(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&CatalogConfig {
        base_url: Url::parse(&server.base_url()).unwrap(),
        access_token: None,
        product_cache_ttl: Duration::from_secs(300),
    })
}

#[tokio::test]
async fn test_cart_survives_reopen() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();

    let store = CartStore::open(catalog(&server), FileStorage::new(dir.path())).await;
    store.add_product(ProductId::new(1)).await.unwrap();
    store.add_product(ProductId::new(1)).await.unwrap();
    drop(store);

    let reopened = CartStore::open(catalog(&server), FileStorage::new(dir.path())).await;
    let cart = reopened.items().await;

    assert_eq!(cart.len(), 1);
    let line = &cart.items()[0];
    assert_eq!(line.product_id, ProductId::new(1));
    assert_eq!(line.title, "Tênis de Caminhada Leve Confortável");
    assert_eq!(line.quantity.get(), 2);
    assert_eq!(reopened.summary().await.total, Price::from_cents(35980));
}

#[tokio::test]
async fn test_stored_format() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());

    let store = CartStore::open(catalog(&server), storage.clone()).await;
    store.add_product(ProductId::new(1)).await.unwrap();

    let raw = std::fs::read_to_string(storage.path()).unwrap();
    let stored: Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(
        stored,
        json!([{
            "productId": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "unitPrice": "179.90",
            "imageRef": "https://cdn.example.com/tenis.jpg",
            "quantity": 1
        }])
    );
}

#[tokio::test]
async fn test_stock_limits_are_enforced() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();
    let messages = Messages::default();

    let storage = FileStorage::new(dir.path());
    let store = CartStore::open_with_notifier(catalog(&server), storage, messages.clone()).await;

    store.add_product(ProductId::new(1)).await.unwrap();
    store.add_product(ProductId::new(1)).await.unwrap();

    let err = store.add_product(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(
        err,
        CartError::OutOfStock {
            requested: 3,
            available: 2,
            ..
        }
    ));

    let err = store.add_product(ProductId::new(2)).await.unwrap_err();
    assert!(matches!(err, CartError::OutOfStock { available: 0, .. }));

    assert!(store.set_quantity(ProductId::new(1), 5).await.is_err());
    assert_eq!(store.quantity_of(ProductId::new(1)).await, 2);

    assert_eq!(messages.all(), vec!["Requested quantity is out of stock"; 3]);
}

#[tokio::test]
async fn test_rejected_operation_leaves_disk_untouched() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());

    let store = CartStore::open(catalog(&server), storage.clone()).await;
    store.add_product(ProductId::new(1)).await.unwrap();
    let before = std::fs::read_to_string(storage.path()).unwrap();

    assert!(store.remove_product(ProductId::new(7)).await.is_err());
    assert!(store.set_quantity(ProductId::new(1), 3).await.is_err());

    let after = std::fs::read_to_string(storage.path()).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_unknown_product_fails_the_addition() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();

    let store = CartStore::open(catalog(&server), FileStorage::new(dir.path())).await;
    let err = store.add_product(ProductId::new(42)).await.unwrap_err();

    assert_eq!(err.user_message(), "Error adding product");
    assert!(matches!(err, CartError::OperationFailed { .. }));
    assert!(std::error::Error::source(&err).is_some());
    assert!(store.items().await.is_empty());
}

#[tokio::test]
async fn test_remove_and_reopen() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();

    let store = CartStore::open(catalog(&server), FileStorage::new(dir.path())).await;
    store.add_product(ProductId::new(1)).await.unwrap();
    store.remove_product(ProductId::new(1)).await.unwrap();
    drop(store);

    let reopened = CartStore::open(catalog(&server), FileStorage::new(dir.path())).await;
    assert!(reopened.items().await.is_empty());
}

#[tokio::test]
async fn test_corrupt_file_opens_empty() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    std::fs::write(storage.path(), "not a cart").unwrap();

    let store = CartStore::open(catalog(&server), storage.clone()).await;
    assert!(store.items().await.is_empty());

    store.add_product(ProductId::new(1)).await.unwrap();
    let raw = std::fs::read_to_string(storage.path()).unwrap();
    assert!(raw.starts_with('['));
}
