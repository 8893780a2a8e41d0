//! Storefront session: signed-in user, carts, dashboard query and theme.
//!
//! A session is restored from a [`KeyValueStore`] and writes every change
//! back immediately, so a later process picks up where this one stopped.

use shopfront_core::{
    CartLine, DashboardFilters, PaginationModel, Product, ProductId, QueryState, SortModel, User,
    UserId,
};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::cart::{CartStore, OrderSummary};
use crate::catalog::{CatalogTransport, find_mock_product};
use crate::query::{Dashboard, DashboardPage, LoadOutcome};
use crate::storage::{KeyValueStore, keys};

/// Errors returned by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No roster user has this id.
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    /// The product is not on the current page, in the cart, or in the mock
    /// catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
}

/// State of one storefront user session.
#[derive(Debug, Clone)]
pub struct StorefrontSession {
    store: KeyValueStore,
    current_user: Option<User>,
    carts: CartStore,
    query: QueryState,
    dark_mode: bool,
    last_page: Option<DashboardPage>,
}

impl StorefrontSession {
    /// Restore a session from `store`. Missing keys fall back to defaults.
    #[must_use]
    pub fn restore(store: KeyValueStore) -> Self {
        let current_user = store.get::<User>(keys::CURRENT_USER);
        let filters = store
            .get::<DashboardFilters>(keys::DASHBOARD_FILTERS)
            .unwrap_or_default();
        let pagination = store
            .get::<PaginationModel>(keys::DASHBOARD_PAGINATION)
            .unwrap_or_default();
        let dark_mode = store.get::<bool>(keys::DARK_MODE).unwrap_or(false);

        debug!(
            user = current_user.as_ref().map(|u| u.username.as_str()),
            "Restored session"
        );

        Self {
            carts: CartStore::load(store.clone()),
            store,
            current_user,
            query: QueryState {
                filters,
                pagination,
            },
            dark_mode,
            last_page: None,
        }
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    fn user_id(&self) -> Option<UserId> {
        self.current_user.as_ref().map(|user| user.id)
    }

    /// Sign in as a roster user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownUser` if no roster user has `user_id`.
    #[instrument(skip(self))]
    pub fn login(&mut self, user_id: UserId) -> Result<&User, SessionError> {
        let user = User::find(user_id).ok_or(SessionError::UnknownUser(user_id))?;
        self.store.set(keys::CURRENT_USER, user);
        info!(username = %user.username, "Logged in");
        Ok(self.current_user.insert(user.clone()))
    }

    /// Sign out. Carts are kept for the next login.
    pub fn logout(&mut self) {
        if let Some(user) = self.current_user.take() {
            info!(username = %user.username, "Logged out");
        }
        self.store.remove(keys::CURRENT_USER);
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// The signed-in user's cart lines, empty when signed out.
    #[must_use]
    pub fn current_cart(&self) -> &[CartLine] {
        self.carts.items(self.user_id())
    }

    /// All carts.
    #[must_use]
    pub const fn carts(&self) -> &CartStore {
        &self.carts
    }

    pub fn add_to_cart(&mut self, product: &Product) {
        self.carts.add_to_cart(self.user_id(), product);
    }

    /// Set a line's quantity. Zero or negative quantities remove the line.
    pub fn update_cart_item_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        self.carts
            .update_cart_item_quantity(self.user_id(), product_id, quantity);
    }

    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        self.carts.remove_from_cart(self.user_id(), product_id);
    }

    #[must_use]
    pub fn get_cart_item_quantity(&self, product_id: &ProductId) -> u32 {
        self.carts.get_cart_item_quantity(self.user_id(), product_id)
    }

    #[must_use]
    pub fn get_total_cart_value(&self) -> rust_decimal::Decimal {
        self.carts.get_total_cart_value(self.user_id())
    }

    #[must_use]
    pub fn get_cart_items_count(&self) -> u64 {
        self.carts.get_cart_items_count(self.user_id())
    }

    /// Place an order for the signed-in user's cart.
    pub fn place_order(&mut self) -> Option<OrderSummary> {
        self.carts.place_order(self.user_id())
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Current search, filter, sort and pagination.
    #[must_use]
    pub const fn query(&self) -> &QueryState {
        &self.query
    }

    /// Set the search term. The page is kept; a page past the end loads empty.
    pub fn set_search_term(&mut self, term: &str) {
        self.query.filters.search_term = term.to_string();
        self.persist_query();
    }

    /// Set the category filter (empty for all).
    pub fn set_category_filter(&mut self, category: &str) {
        self.query.filters.category_filter = category.to_string();
        self.persist_query();
    }

    /// Set or clear the sort key.
    pub fn set_sort(&mut self, sort: Option<SortModel>) {
        self.query.filters.sort_model = sort.into_iter().collect();
        self.persist_query();
    }

    /// Jump to a 0-indexed page.
    pub fn set_page(&mut self, page: u32) {
        self.query.pagination.page = page;
        self.persist_query();
    }

    /// Change the page size.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.query.pagination.page_size = page_size.max(1);
        self.persist_query();
    }

    /// Restore the default query.
    pub fn reset_query(&mut self) {
        self.query = QueryState::default();
        self.persist_query();
    }

    fn persist_query(&self) {
        self.store.set(keys::DASHBOARD_FILTERS, &self.query.filters);
        self.store
            .set(keys::DASHBOARD_PAGINATION, &self.query.pagination);
    }

    /// Load the dashboard page for the current query.
    ///
    /// A loaded page is remembered for [`find_product`](Self::find_product).
    pub async fn load_dashboard<T: CatalogTransport>(
        &mut self,
        dashboard: &Dashboard<T>,
    ) -> LoadOutcome {
        let outcome = dashboard.load(&self.query).await;
        if let LoadOutcome::Loaded(page) = &outcome {
            self.last_page = Some(page.clone());
        }
        outcome
    }

    /// The most recently loaded dashboard page.
    #[must_use]
    pub const fn last_page(&self) -> Option<&DashboardPage> {
        self.last_page.as_ref()
    }

    /// Find a product by id on the last loaded page, in the signed-in user's
    /// cart, or in the mock catalog.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ProductNotFound` if none of those have it.
    pub fn find_product(&self, product_id: &ProductId) -> Result<Product, SessionError> {
        let on_page = self
            .last_page
            .iter()
            .flat_map(|page| &page.products)
            .find(|product| &product.id == product_id);
        let in_cart = || {
            self.current_cart()
                .iter()
                .map(|line| &line.product)
                .find(|product| &product.id == product_id)
        };

        on_page
            .or_else(in_cart)
            .or_else(|| find_mock_product(product_id))
            .cloned()
            .ok_or_else(|| SessionError::ProductNotFound(product_id.clone()))
    }

    // =========================================================================
    // Theme
    // =========================================================================

    #[must_use]
    pub const fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
        self.store.set(keys::DARK_MODE, &enabled);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use shopfront_core::{SortDirection, SortField};

    use super::*;
    use crate::catalog::tests::FailingTransport;
    use crate::catalog::{CatalogClient, mock_catalog};

    fn session() -> StorefrontSession {
        StorefrontSession::restore(KeyValueStore::in_memory())
    }

    #[test]
    fn test_fresh_session_defaults() {
        let session = session();
        assert!(session.current_user().is_none());
        assert!(!session.dark_mode());
        assert_eq!(session.query(), &QueryState::default());
        assert!(session.current_cart().is_empty());
    }

    #[test]
    fn test_login_and_logout() {
        let mut session = session();
        let user = session.login(UserId::new(3)).unwrap();
        assert_eq!(user.username, "mokshith");
        assert_eq!(session.current_user().unwrap().id, UserId::new(3));

        session.logout();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_login_unknown_user() {
        let mut session = session();
        let err = session.login(UserId::new(99)).unwrap_err();
        assert!(matches!(err, SessionError::UnknownUser(id) if id == UserId::new(99)));
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_cart_requires_login() {
        let mut session = session();
        let product = mock_catalog()[0].clone();
        session.add_to_cart(&product);
        assert_eq!(session.get_cart_items_count(), 0);

        session.login(UserId::new(1)).unwrap();
        session.add_to_cart(&product);
        assert_eq!(session.get_cart_items_count(), 1);
    }

    #[test]
    fn test_carts_survive_logout() {
        let mut session = session();
        let product = mock_catalog()[4].clone();
        session.login(UserId::new(1)).unwrap();
        session.add_to_cart(&product);
        session.logout();
        assert!(session.current_cart().is_empty());

        session.login(UserId::new(1)).unwrap();
        assert_eq!(session.get_cart_item_quantity(&product.id), 1);
    }

    #[test]
    fn test_negative_quantity_removes_line() {
        let mut session = session();
        let product = mock_catalog()[0].clone();
        session.login(UserId::new(1)).unwrap();
        session.add_to_cart(&product);
        session.update_cart_item_quantity(&product.id, 4);
        assert_eq!(session.get_cart_item_quantity(&product.id), 4);
        assert_eq!(session.get_total_cart_value(), product.price * Decimal::from(4));

        session.update_cart_item_quantity(&product.id, -2);
        assert!(session.current_cart().is_empty());
    }

    #[test]
    fn test_place_order_then_add_again() {
        let mut session = session();
        let product = mock_catalog()[0].clone();
        session.login(UserId::new(2)).unwrap();
        session.add_to_cart(&product);

        let summary = session.place_order().unwrap();
        assert_eq!(summary.item_count, 1);
        assert!(session.current_cart().is_empty());
        assert!(session.place_order().is_none());

        session.add_to_cart(&product);
        assert_eq!(session.get_cart_items_count(), 1);
    }

    #[test]
    fn test_query_setters_keep_page() {
        let mut session = session();
        session.set_page(4);
        session.set_search_term("rice");
        assert_eq!(session.query().pagination.page, 4);

        session.set_category_filter("FOOD & BEVERAGES");
        assert_eq!(session.query().pagination.page, 4);

        session.set_sort(Some(SortModel::new(SortField::Price, SortDirection::Desc)));
        assert_eq!(session.query().pagination.page, 4);

        session.set_page_size(50);
        assert_eq!(session.query().pagination.page, 4);
        assert_eq!(session.query().pagination.page_size, 50);
        assert_eq!(session.query().filters.search_term, "rice");
    }

    #[test]
    fn test_state_survives_restore() {
        let store = KeyValueStore::in_memory();
        let product = mock_catalog()[9].clone();
        {
            let mut session = StorefrontSession::restore(store.clone());
            session.login(UserId::new(5)).unwrap();
            session.add_to_cart(&product);
            session.set_search_term("brand 1");
            session.set_sort(Some(SortModel::new(SortField::Rating, SortDirection::Asc)));
            session.set_page(1);
            session.set_dark_mode(true);
        }

        let session = StorefrontSession::restore(store);
        assert_eq!(session.current_user().unwrap().username, "sachith");
        assert_eq!(session.get_cart_item_quantity(&product.id), 1);
        assert_eq!(session.query().filters.search_term, "brand 1");
        assert_eq!(
            session.query().filters.sort(),
            Some(SortModel::new(SortField::Rating, SortDirection::Asc))
        );
        assert_eq!(session.query().pagination.page, 1);
        assert!(session.dark_mode());
    }

    #[test]
    fn test_reset_query() {
        let mut session = session();
        session.set_search_term("tea");
        session.set_page(2);
        session.reset_query();
        assert_eq!(session.query(), &QueryState::default());
    }

    #[tokio::test]
    async fn test_find_product_sources() {
        let dashboard = Dashboard::new(CatalogClient::new(FailingTransport), Duration::ZERO);
        let mut session = session();

        let outcome = session.load_dashboard(&dashboard).await;
        assert!(matches!(outcome, LoadOutcome::Loaded(_)));
        assert_eq!(session.last_page().unwrap().products.len(), 20);

        let found = session.find_product(&ProductId::new("mock-3")).unwrap();
        assert_eq!(found.id.as_str(), "mock-3");

        // Remote-looking product only reachable through the cart.
        let mut remote = mock_catalog()[0].clone();
        remote.id = ProductId::new("8904109450013");
        session.login(UserId::new(1)).unwrap();
        session.add_to_cart(&remote);
        assert_eq!(
            session.find_product(&remote.id).unwrap().id,
            remote.id
        );

        let err = session.find_product(&ProductId::new("missing")).unwrap_err();
        assert!(matches!(err, SessionError::ProductNotFound(_)));
    }
}
