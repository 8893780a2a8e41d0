//! Unified error handling.
//!
//! Provides a unified `AppError` type for the operations that can fail past
//! a component boundary: configuration loading, catalog client setup, and
//! session commands. Catalog fetches and storage never fail outward.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::session::SessionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog client could not be set up.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A session command was rejected.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
