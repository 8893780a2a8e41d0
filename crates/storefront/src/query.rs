//! Dashboard query engine: sorting, facets and sequenced page loads.
//!
//! The catalog API filters and paginates; sorting is applied locally to the
//! returned page only, so ordering never spans pages.

use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;

use serde::Serialize;
use shopfront_core::{Product, QueryState, SortDirection, SortField, SortModel};
use tracing::{debug, instrument, warn};

use crate::catalog::{CatalogClient, CatalogPage, CatalogSource, CatalogTransport, HttpTransport};

/// Sort `products` by a single key. Stable: equal keys keep their input order.
#[must_use]
pub fn apply_sort(mut products: Vec<Product>, sort: Option<SortModel>) -> Vec<Product> {
    let Some(sort) = sort else {
        return products;
    };

    products.sort_by(|a, b| {
        let ordering = compare_by(a, b, sort.field);
        match sort.sort {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    products
}

fn compare_by(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Category => a.category.cmp(&b.category),
        SortField::Brand => a.brand.cmp(&b.brand),
        SortField::Price => a.price.cmp(&b.price),
        SortField::Stock => a.stock.cmp(&b.stock),
        SortField::Rating => a.rating.total_cmp(&b.rating),
    }
}

/// Distinct categories of `products`, in first-seen order. Dashboard pages
/// collect them after sorting, so they follow the displayed row order.
#[must_use]
pub fn category_facets(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        if !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}

/// Whether `page` was served from the offline mock catalog.
#[must_use]
pub fn is_offline(page: &CatalogPage) -> bool {
    page.is_offline()
}

/// A sorted dashboard page ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub total_pages: u32,
    /// Categories present on this page.
    pub categories: Vec<String>,
    pub source: CatalogSource,
    pub offline: bool,
}

impl DashboardPage {
    fn from_catalog(page: CatalogPage, sort: Option<SortModel>) -> Self {
        let offline = is_offline(&page);
        let products = apply_sort(page.products, sort);
        let categories = category_facets(&products);
        Self {
            products,
            total: page.total,
            total_pages: page.total_pages,
            categories,
            source: page.source,
            offline,
        }
    }
}

/// Result of [`Dashboard::load`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The load was the most recent one and completed.
    Loaded(DashboardPage),
    /// A newer load was issued before this one finished; its result is dropped.
    Superseded,
}

impl LoadOutcome {
    /// The loaded page, if this load was not superseded.
    #[must_use]
    pub fn into_page(self) -> Option<DashboardPage> {
        match self {
            Self::Loaded(page) => Some(page),
            Self::Superseded => None,
        }
    }
}

/// Debounced, last-request-wins loader for dashboard pages.
///
/// Each [`load`](Self::load) takes a new request id. After the debounce delay
/// the load is skipped if a newer one was issued, and a completed fetch is
/// discarded if a newer load was issued while it was in flight.
#[derive(Debug)]
pub struct Dashboard<T = HttpTransport> {
    catalog: CatalogClient<T>,
    debounce: Duration,
    latest: Arc<AtomicU64>,
}

impl<T> Clone for Dashboard<T> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            debounce: self.debounce,
            latest: Arc::clone(&self.latest),
        }
    }
}

impl<T: CatalogTransport> Dashboard<T> {
    /// Create a loader over `catalog`.
    pub fn new(catalog: CatalogClient<T>, debounce: Duration) -> Self {
        Self {
            catalog,
            debounce,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The underlying catalog client.
    pub const fn catalog(&self) -> &CatalogClient<T> {
        &self.catalog
    }

    /// Load the page described by `query`.
    #[instrument(skip(self, query), fields(page = query.pagination.page))]
    pub async fn load(&self, query: &QueryState) -> LoadOutcome {
        let request_id = self.latest.fetch_add(1, AtomicOrdering::SeqCst) + 1;

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }
        if !self.is_latest(request_id) {
            debug!(request_id, "Skipping debounced load, newer request pending");
            return LoadOutcome::Superseded;
        }

        let filters = &query.filters;
        let page = self
            .catalog
            .fetch_page(
                query.pagination.api_page(),
                query.pagination.limit(),
                &filters.search_term,
                &filters.category_filter,
            )
            .await;

        if !self.is_latest(request_id) {
            warn!(request_id, "Discarding superseded catalog response");
            return LoadOutcome::Superseded;
        }

        LoadOutcome::Loaded(DashboardPage::from_catalog(page, filters.sort()))
    }

    fn is_latest(&self, request_id: u64) -> bool {
        self.latest.load(AtomicOrdering::SeqCst) == request_id
    }
}
