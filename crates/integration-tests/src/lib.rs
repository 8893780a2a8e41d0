//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_http` - Catalog client against a local HTTP server
//! - `session_flow` - Sessions persisted to a JSON file across restores
//!
//! [`CatalogServer`] stands in for the remote catalog API: it serves one
//! canned response on `/cms/products` and records every query it receives.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use shopfront_storefront::config::CatalogConfig;
use tokio::task::JoinHandle;
use url::Url;

/// What the fake catalog answers with.
#[derive(Debug, Clone)]
pub enum CannedResponse {
    /// 200 with a JSON body.
    Json(serde_json::Value),
    /// The given status with a plain-text body.
    Status(u16, String),
    /// 200 with an arbitrary body labelled as JSON.
    Raw(String),
}

type RecordedQueries = Arc<Mutex<Vec<HashMap<String, String>>>>;

#[derive(Clone)]
struct ServerState {
    response: CannedResponse,
    requests: RecordedQueries,
}

/// Local HTTP server impersonating the catalog API.
///
/// The server task is aborted on drop.
pub struct CatalogServer {
    url: Url,
    requests: RecordedQueries,
    handle: JoinHandle<()>,
}

impl CatalogServer {
    /// Bind to an ephemeral localhost port and start serving `response`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(response: CannedResponse) -> std::io::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests = RecordedQueries::default();

        let app = Router::new()
            .route("/cms/products", get(products))
            .with_state(ServerState {
                response,
                requests: Arc::clone(&requests),
            });

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let url = Url::parse(&format!("http://{addr}/cms/products"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        Ok(Self {
            url,
            requests,
            handle,
        })
    }

    /// Catalog configuration pointing at this server.
    #[must_use]
    pub fn config(&self) -> CatalogConfig {
        CatalogConfig::new(self.url.clone())
    }

    /// Query parameters of every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Drop for CatalogServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn products(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(params);
    }

    match state.response {
        CannedResponse::Json(body) => Json(body).into_response(),
        CannedResponse::Status(code, body) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, body).into_response()
        }
        CannedResponse::Raw(body) => {
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
    }
}

/// A realistic two-product catalog page.
#[must_use]
pub fn sample_page() -> serde_json::Value {
    serde_json::json!({
        "products": [
            {
                "id": "cms-101",
                "name": "RTN DLX BUCKET 18L",
                "mrp": { "mrp": 249 },
                "main_category": "HOUSE HOLD NEEDS",
                "description": "Heavy duty bucket with steel handle",
                "images": { "front": "https://cdn.example.com/101.jpg" },
                "brand": "RTN",
                "gtin": "8904109450013",
                "sellingUnit": "pcs",
                "isLocalProduct": "Yes"
            },
            {
                "name": "Premium Tea Leaves",
                "mrp": { "mrp": "185.50" },
                "main_category": "FOOD & BEVERAGES",
                "derived_description": "Assam CTC blend",
                "company_detail": { "brand": "Hill Estate" },
                "gtin": 8_901_234_567_890_u64
            }
        ],
        "totalResults": "42",
        "currentPage": 2,
        "totalPages": "3",
        "currentPageResults": 2
    })
}
