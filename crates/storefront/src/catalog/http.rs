//! HTTP transport for the catalog API.

use std::sync::Arc;

use tracing::{debug, error, instrument};
use url::Url;

use super::types::RemoteCatalogResponse;
use super::{CatalogError, CatalogRequest, CatalogTransport};
use crate::config::CatalogConfig;

/// Maximum number of body characters kept in logs and errors.
const BODY_PREVIEW_CHARS: usize = 500;

/// `reqwest`-backed [`CatalogTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Arc<HttpTransportInner>,
}

#[derive(Debug)]
struct HttpTransportInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpTransportInner {
                client,
                endpoint: config.api_url.clone(),
            }),
        })
    }

    /// Full request URL for `request`. Empty search and category are omitted.
    #[must_use]
    pub fn request_url(&self, request: &CatalogRequest) -> Url {
        let mut url = self.inner.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &request.page.to_string())
                .append_pair("limit", &request.limit.to_string());
            if !request.search.is_empty() {
                query.append_pair("search", &request.search);
            }
            if !request.category.is_empty() {
                query.append_pair("category", &request.category);
            }
        }
        url
    }
}

impl CatalogTransport for HttpTransport {
    #[instrument(skip(self), fields(page = request.page, limit = request.limit))]
    async fn fetch(
        &self,
        request: &CatalogRequest,
    ) -> Result<RemoteCatalogResponse, CatalogError> {
        let url = self.request_url(request);
        debug!(%url, "Requesting catalog page");

        let response = self
            .inner
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let body = preview(&response_text);
            error!(status = %status, body = %body, "Catalog API returned non-success status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            error!(
                error = %e,
                body = %preview(&response_text),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
