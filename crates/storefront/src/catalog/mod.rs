//! Product catalog client with offline fallback.
//!
//! # Architecture
//!
//! - [`CatalogTransport`] performs the raw page request (HTTP in production,
//!   stubs in tests)
//! - [`CatalogClient`] normalizes the response into [`Product`]s, or falls
//!   back to the deterministic mock catalog on any failure
//! - Every [`CatalogPage`] records its [`CatalogSource`], which is how callers
//!   detect offline mode
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::catalog::{CatalogClient, HttpTransport};
//!
//! let client = CatalogClient::new(HttpTransport::new(&config.catalog)?);
//! let page = client.fetch_page(1, 20, "rice", "").await;
//! if page.is_offline() {
//!     tracing::warn!("showing cached results");
//! }
//! ```

mod conversions;
mod http;
mod mock;
pub mod types;

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use shopfront_core::{Product, ProductId};
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub use http::HttpTransport;
pub use mock::{MOCK_CATALOG_SIZE, MOCK_CATEGORIES, find_mock_product, mock_catalog};
pub use types::RemoteCatalogResponse;

use conversions::convert_catalog_response;
use mock::mock_page;

/// Errors that can occur when talking to the catalog API.
///
/// [`CatalogClient`] absorbs these into the mock fallback; they are only
/// visible to transport implementations and logs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Catalog API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where a page of products came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Live catalog API.
    Remote,
    /// Generated mock catalog (offline mode).
    Mock,
}

/// Parameters of one catalog page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    /// 1-indexed page number.
    pub page: u32,
    /// Page size, never zero.
    pub limit: u32,
    pub search: String,
    pub category: String,
}

impl CatalogRequest {
    /// Build a request. `page` is raised to 1 and `limit` to 1 if zero.
    #[must_use]
    pub fn new(page: u32, limit: u32, search: &str, category: &str) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search: search.to_string(),
            category: category.to_string(),
        }
    }
}

/// One page of products plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    /// Size of the full filtered result set.
    pub total: u64,
    /// 1-indexed page number.
    pub page: u32,
    pub total_pages: u32,
    pub current_page_results: u32,
    pub source: CatalogSource,
}

impl CatalogPage {
    /// Whether this page was served from the mock catalog.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.source == CatalogSource::Mock
    }
}

/// Whether any product carries the mock id marker.
///
/// Kept for data persisted before pages carried a [`CatalogSource`]; prefer
/// [`CatalogPage::is_offline`].
#[must_use]
pub fn contains_mock_products(products: &[Product]) -> bool {
    products.iter().any(|product| product.id.is_mock())
}

/// Fetches one raw page from the catalog API.
pub trait CatalogTransport: Send + Sync {
    /// Request the page described by `request`.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status, or an
    /// unparseable body.
    fn fetch(
        &self,
        request: &CatalogRequest,
    ) -> impl Future<Output = Result<RemoteCatalogResponse, CatalogError>> + Send;
}

/// Catalog client that never fails: errors fall back to mock data.
#[derive(Debug)]
pub struct CatalogClient<T = HttpTransport> {
    transport: Arc<T>,
}

impl<T> Clone for CatalogClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: CatalogTransport> CatalogClient<T> {
    /// Create a client over `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Fetch one page of products.
    ///
    /// `page` is 1-indexed. Empty `search` / `category` mean "no filter".
    /// Any transport or parse failure is logged and answered from the mock
    /// catalog with the same filters applied.
    #[instrument(skip(self))]
    pub async fn fetch_page(
        &self,
        page: u32,
        limit: u32,
        search: &str,
        category: &str,
    ) -> CatalogPage {
        let request = CatalogRequest::new(page, limit, search, category);

        match self.transport.fetch(&request).await {
            Ok(response) => {
                let page = convert_catalog_response(response, &request, &mut rand::rng());
                debug!(
                    products = page.products.len(),
                    total = page.total,
                    "Fetched catalog page"
                );
                page
            }
            Err(e) => {
                warn!(error = %e, "Catalog API unavailable, using mock data");
                mock_page(&request)
            }
        }
    }

    /// Look up a product the catalog can resolve without a network call.
    ///
    /// Only mock products are addressable by id; remote products are found
    /// through the page they were listed on.
    #[must_use]
    pub fn find_offline_product(&self, id: &ProductId) -> Option<Product> {
        find_mock_product(id).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    /// Transport that always fails like an unreachable host.
    pub struct FailingTransport;

    impl CatalogTransport for FailingTransport {
        async fn fetch(
            &self,
            _request: &CatalogRequest,
        ) -> Result<RemoteCatalogResponse, CatalogError> {
            Err(CatalogError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }

    /// Transport that serves a fixed JSON body and records requests.
    pub struct StaticTransport {
        pub body: serde_json::Value,
        pub requests: Mutex<Vec<CatalogRequest>>,
    }

    impl StaticTransport {
        pub fn new(body: serde_json::Value) -> Self {
            Self {
                body,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl CatalogTransport for StaticTransport {
        async fn fetch(
            &self,
            request: &CatalogRequest,
        ) -> Result<RemoteCatalogResponse, CatalogError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(serde_json::from_value(self.body.clone())?)
        }
    }

    #[tokio::test]
    async fn test_failing_transport_falls_back_to_mock() {
        let client = CatalogClient::new(FailingTransport);
        let page = client.fetch_page(1, 20, "", "").await;

        assert_eq!(page.products.len(), 20);
        assert!(page.products.iter().all(|p| p.id.is_mock()));
        assert_eq!(page.total, 200);
        assert!(page.is_offline());
        assert!(contains_mock_products(&page.products));
    }

    #[tokio::test]
    async fn test_fallback_applies_filters() {
        let client = CatalogClient::new(FailingTransport);
        let page = client.fetch_page(1, 50, "", "PERSONAL CARE").await;

        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 1);
        assert!(page.products.iter().all(|p| p.category == "PERSONAL CARE"));
    }

    #[tokio::test]
    async fn test_remote_page_is_normalized() {
        let transport = StaticTransport::new(json!({
            "products": [
                { "id": "a1", "name": "Tea", "mrp": { "mrp": 120 }, "main_category": "FOOD" }
            ],
            "totalResults": 41,
            "currentPage": 3,
            "totalPages": 3,
            "currentPageResults": 1
        }));
        let client = CatalogClient::new(transport);
        let page = client.fetch_page(3, 20, "tea", "FOOD").await;

        assert!(!page.is_offline());
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].id.as_str(), "a1");
        assert_eq!(page.total, 41);

        let requests = client.transport.requests.lock().unwrap();
        assert_eq!(
            requests.as_slice(),
            &[CatalogRequest::new(3, 20, "tea", "FOOD")]
        );
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let client = CatalogClient::new(StaticTransport::new(json!({ "products": "nope" })));
        let page = client.fetch_page(1, 10, "", "").await;

        assert!(page.is_offline());
        assert_eq!(page.products.len(), 10);
    }

    #[test]
    fn test_request_clamps_zero_values() {
        let request = CatalogRequest::new(0, 0, "", "");
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 1);
    }

    #[test]
    fn test_find_offline_product() {
        let client = CatalogClient::new(FailingTransport);
        assert!(client.find_offline_product(&ProductId::new("mock-7")).is_some());
        assert!(client.find_offline_product(&ProductId::new("a1")).is_none());
    }
}
