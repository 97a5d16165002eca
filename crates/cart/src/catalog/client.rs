use std::sync::Arc;

use moka::future::Cache;
use pocket_cart_core::{Product, ProductId};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};
use url::Url;

use super::LookupError;
use crate::config::CatalogConfig;
use crate::ports::{ProductLookup, StockOracle};

/// Maximum number of response body characters kept in errors and logs.
const BODY_SNIPPET_CHARS: usize = 200;

/// Client for the catalog API.
///
/// Provides stock levels and product details. Products are cached; stock
/// levels always go to the network.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    access_token: Option<SecretString>,
    products: Cache<ProductId, Product>,
}

#[derive(Debug, Deserialize)]
struct StockResponse {
    amount: u32,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        // Relative joins only keep the last path segment with a trailing slash
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url,
                access_token: config.access_token.clone(),
                products,
            }),
        }
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LookupError> {
        let url = self.inner.base_url.join(path)?;

        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(path.to_string()));
        }

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(LookupError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %snippet(&response_text),
                "Catalog API returned non-success status"
            );
            return Err(LookupError::Status {
                status,
                body: snippet(&response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %snippet(&response_text),
                "Failed to parse catalog response"
            );
            LookupError::Parse(e)
        })
    }

    /// Get the number of units currently available for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the product is unknown.
    #[instrument(skip(self))]
    pub async fn get_stock(&self, id: ProductId) -> Result<u32, LookupError> {
        let stock: StockResponse = self.get_json(&format!("stock/{id}")).await?;
        debug!(available = stock.amount, "Fetched stock level");
        Ok(stock.amount)
    }

    /// Get a product's details.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the product is unknown.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, LookupError> {
        // Check cache
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{id}")).await?;

        // Cache the result
        self.inner.products.insert(id, product.clone()).await;

        Ok(product)
    }
}

impl StockOracle for CatalogClient {
    async fn stock(&self, id: ProductId) -> Result<u32, LookupError> {
        self.get_stock(id).await
    }
}

impl ProductLookup for CatalogClient {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        self.get_product(id).await
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config(base: &str) -> CatalogConfig {
        CatalogConfig {
            base_url: Url::parse(base).unwrap(),
            access_token: None,
            product_cache_ttl: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = CatalogClient::new(&config("http://localhost:3333/api"));
        assert_eq!(client.inner.base_url.as_str(), "http://localhost:3333/api/");
        assert_eq!(
            client.inner.base_url.join("stock/1").unwrap().as_str(),
            "http://localhost:3333/api/stock/1"
        );
    }

    #[test]
    fn test_base_url_root() {
        let client = CatalogClient::new(&config("http://localhost:3333"));
        assert_eq!(
            client.inner.base_url.join("products/2").unwrap().as_str(),
            "http://localhost:3333/products/2"
        );
    }

    #[test]
    fn test_snippet_truncates() {
        let body = "x".repeat(500);
        assert_eq!(snippet(&body).len(), BODY_SNIPPET_CHARS);
        assert_eq!(snippet("short"), "short");
    }
}
