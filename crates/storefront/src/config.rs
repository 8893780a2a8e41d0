//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CATALOG_API_URL` - Catalog products endpoint (default: the dev catalog service)
//! - `CATALOG_TIMEOUT_SECS` - HTTP timeout for catalog requests (default: 10)
//! - `CATALOG_DEBOUNCE_MS` - Dashboard reload debounce (default: 300)
//! - `STOREFRONT_DATA_PATH` - Persisted state file (default: .shopfront/state.json),
//!   or `:memory:` to keep state in memory only

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default catalog products endpoint.
pub const DEFAULT_CATALOG_API_URL: &str =
    "https://catalog-management-system-dev-ak3ogf6zeauc.a.run.app/cms/products";

/// Default location of the persisted state file.
pub const DEFAULT_DATA_PATH: &str = ".shopfront/state.json";

/// `STOREFRONT_DATA_PATH` value selecting the in-memory store.
pub const MEMORY_DATA_PATH: &str = ":memory:";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog API configuration
    pub catalog: CatalogConfig,
    /// Where persisted state lives
    pub storage: StorageLocation,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Products endpoint
    pub api_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Delay before a dashboard load hits the network
    pub debounce: Duration,
}

impl CatalogConfig {
    /// Configuration for `api_url` with the default timeout and debounce.
    #[must_use]
    pub const fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: Duration::from_secs(10),
            debounce: Duration::from_millis(300),
        }
    }
}

/// Backing store for persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// JSON file at the given path
    File(PathBuf),
    /// Process memory; nothing survives exit
    Memory,
}

impl StorageLocation {
    fn parse(value: &str) -> Self {
        if value == MEMORY_DATA_PATH {
            Self::Memory
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            catalog: CatalogConfig::from_env()?,
            storage: StorageLocation::parse(&get_env_or_default(
                "STOREFRONT_DATA_PATH",
                DEFAULT_DATA_PATH,
            )),
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_url = parse_catalog_url(
            "CATALOG_API_URL",
            &get_env_or_default("CATALOG_API_URL", DEFAULT_CATALOG_API_URL),
        )?;
        let timeout_secs = parse_number(
            "CATALOG_TIMEOUT_SECS",
            &get_env_or_default("CATALOG_TIMEOUT_SECS", "10"),
        )?;
        let debounce_ms = parse_number(
            "CATALOG_DEBOUNCE_MS",
            &get_env_or_default("CATALOG_DEBOUNCE_MS", "300"),
        )?;

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            debounce: Duration::from_millis(debounce_ms),
        })
    }
}

/// Parse and validate an HTTP(S) endpoint.
fn parse_catalog_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
