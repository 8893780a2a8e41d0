//! Dashboard query state: search, category filter, sort and pagination.
//!
//! Filters and pagination persist separately so their JSON shapes stay
//! `{ searchTerm, categoryFilter, sortModel: [{ field, sort }] }` and
//! `{ page, pageSize }`.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rows per dashboard page unless the user picks another size.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Error returned when parsing an unknown [`SortField`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid sort field: {0} (expected name, category, brand, price, stock or rating)")]
pub struct ParseSortFieldError(String);

/// Product attribute the dashboard can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Category,
    Brand,
    Price,
    Stock,
    Rating,
}

impl SortField {
    /// Whether values of this field compare as numbers.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Price | Self::Stock | Self::Rating)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Brand => "brand",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::Rating => "rating",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ParseSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "brand" => Ok(Self::Brand),
            "price" => Ok(Self::Price),
            "stock" => Ok(Self::Stock),
            "rating" => Ok(Self::Rating),
            _ => Err(ParseSortFieldError(s.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A single sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortModel {
    pub field: SortField,
    pub sort: SortDirection,
}

impl SortModel {
    #[must_use]
    pub const fn new(field: SortField, sort: SortDirection) -> Self {
        Self { field, sort }
    }
}

/// Persisted search, category and sort selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardFilters {
    pub search_term: String,
    pub category_filter: String,
    /// Only the first entry is applied.
    pub sort_model: Vec<SortModel>,
}

impl DashboardFilters {
    /// The active sort key, if any.
    #[must_use]
    pub fn sort(&self) -> Option<SortModel> {
        self.sort_model.first().copied()
    }
}

/// Persisted pagination position. `page` is 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationModel {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PaginationModel {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationModel {
    /// Page size, never zero.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.page_size.max(1)
    }

    /// Offset of the first row of this page in the filtered result set.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.limit())
    }

    /// 1-indexed page number used by the catalog API.
    #[must_use]
    pub const fn api_page(&self) -> u32 {
        self.page.saturating_add(1)
    }
}

/// Everything needed to request one dashboard page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub filters: DashboardFilters,
    pub pagination: PaginationModel,
}
