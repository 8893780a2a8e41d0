//! Application state shared across commands.

use std::sync::Arc;

use crate::catalog::{CatalogClient, CatalogError, HttpTransport};
use crate::config::{StorageLocation, StorefrontConfig};
use crate::query::Dashboard;
use crate::session::StorefrontSession;
use crate::storage::KeyValueStore;

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog loader, the store, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    dashboard: Dashboard<HttpTransport>,
    store: KeyValueStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let transport = HttpTransport::new(&config.catalog)?;
        let dashboard = Dashboard::new(CatalogClient::new(transport), config.catalog.debounce);
        let store = match &config.storage {
            StorageLocation::File(path) => KeyValueStore::open_file(path.clone()),
            StorageLocation::Memory => KeyValueStore::in_memory(),
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                dashboard,
                store,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the dashboard loader.
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard<HttpTransport> {
        &self.inner.dashboard
    }

    /// Get a reference to the key/value store.
    #[must_use]
    pub fn store(&self) -> &KeyValueStore {
        &self.inner.store
    }

    /// Restore the persisted session.
    #[must_use]
    pub fn session(&self) -> StorefrontSession {
        StorefrontSession::restore(self.inner.store.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::UserId;
    use url::Url;

    use super::*;
    use crate::config::CatalogConfig;

    fn config(storage: StorageLocation) -> StorefrontConfig {
        StorefrontConfig {
            catalog: CatalogConfig::new(Url::parse("http://127.0.0.1:9/cms/products").unwrap()),
            storage,
        }
    }

    #[test]
    fn test_sessions_share_the_store() {
        let state = AppState::new(config(StorageLocation::Memory)).unwrap();
        let mut session = state.session();
        session.login(UserId::new(4)).unwrap();

        let restored = state.clone().session();
        assert_eq!(restored.current_user().unwrap().username, "sujith");
        let product = state
            .dashboard()
            .catalog()
            .find_offline_product(&"mock-1".into())
            .unwrap();
        assert_eq!(product.name, "KOLORR ROYAL PEDAL BIN LARGE 1");
    }

    #[test]
    fn test_file_storage_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = AppState::new(config(StorageLocation::File(path.clone()))).unwrap();
        state.session().set_dark_mode(true);

        assert!(path.exists());
        assert_eq!(state.config().storage, StorageLocation::File(path));
    }
}
