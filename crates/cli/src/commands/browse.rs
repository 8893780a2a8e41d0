//! Catalog browsing commands.

use shopfront_core::{Price, Product, ProductId, SortDirection, SortField, SortModel};
use shopfront_storefront::query::{DashboardPage, LoadOutcome};
use shopfront_storefront::session::{SessionError, StorefrontSession};
use shopfront_storefront::state::AppState;
use tracing::{info, warn};

/// Query changes requested on the command line. `None` keeps the persisted
/// value.
pub struct BrowseOptions {
    pub reset: bool,
    pub search: Option<String>,
    pub category: Option<String>,
    /// `Some(None)` clears the sort; `Some(Some((field, descending)))` sets it.
    pub sort: Option<Option<(SortField, bool)>>,
    /// 1-indexed page number.
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Apply `options` to the persisted query and list the resulting page.
pub async fn browse(state: &AppState, options: BrowseOptions) {
    let mut session = state.session();

    if options.reset {
        session.reset_query();
    }
    if let Some(search) = &options.search {
        session.set_search_term(search);
    }
    if let Some(category) = &options.category {
        session.set_category_filter(category);
    }
    if let Some(sort) = options.sort {
        session.set_sort(sort.map(|(field, descending)| {
            let direction = if descending {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            SortModel::new(field, direction)
        }));
    }
    if let Some(page_size) = options.page_size {
        session.set_page_size(page_size);
    }
    if let Some(page) = options.page {
        session.set_page(page.saturating_sub(1));
    }

    match session.load_dashboard(state.dashboard()).await {
        LoadOutcome::Loaded(page) => print_page(&session, &page),
        LoadOutcome::Superseded => warn!("Catalog request was superseded"),
    }
}

/// Show one product.
///
/// # Errors
///
/// Returns an error if the product cannot be found.
pub async fn show(state: &AppState, product_id: &ProductId) -> Result<(), SessionError> {
    let mut session = state.session();
    let product = resolve_product(state, &mut session, product_id).await?;

    info!("{} [{}]", product.name, product.id);
    info!("  Price:     {}", product.unit_price());
    info!("  Category:  {}", product.category);
    info!("  Brand:     {}", product.brand);
    info!("  Rating:    {:.1} / 5", product.rating);
    info!("  Stock:     {} {}", product.stock, product.selling_unit);
    if !product.gtin.is_empty() {
        info!("  GTIN:      {}", product.gtin);
    }
    if product.is_local_product {
        info!("  Local product");
    }
    info!("  Image:     {}", product.image);
    info!("  {}", product.description);
    for feature in &product.features {
        info!("  - {feature}");
    }

    let in_cart = session.get_cart_item_quantity(&product.id);
    if in_cart > 0 {
        info!("  In cart:   {in_cart}");
    }
    Ok(())
}

/// Find a product, loading the current dashboard page if it is not already
/// known to the session.
pub async fn resolve_product(
    state: &AppState,
    session: &mut StorefrontSession,
    product_id: &ProductId,
) -> Result<Product, SessionError> {
    if let Ok(product) = session.find_product(product_id) {
        return Ok(product);
    }
    session.load_dashboard(state.dashboard()).await;
    session.find_product(product_id)
}

fn print_page(session: &StorefrontSession, page: &DashboardPage) {
    let query = session.query();
    if page.offline {
        warn!("Catalog unavailable, showing offline products");
    }

    info!(
        "Page {} of {} ({} products)",
        query.pagination.page + 1,
        page.total_pages.max(1),
        page.total
    );
    let filters = &query.filters;
    if !filters.search_term.is_empty() {
        info!("Search: {}", filters.search_term);
    }
    if !filters.category_filter.is_empty() {
        info!("Category: {}", filters.category_filter);
    }
    if let Some(sort) = filters.sort() {
        let direction = match sort.sort {
            SortDirection::Asc => "ascending",
            SortDirection::Desc => "descending",
        };
        info!("Sorted by {} {direction}", sort.field);
    }
    if !page.categories.is_empty() {
        info!("Categories on this page: {}", page.categories.join(", "));
    }

    if page.products.is_empty() {
        info!("No products found");
        return;
    }

    for product in &page.products {
        let in_cart = session.get_cart_item_quantity(&product.id);
        let cart_note = if in_cart > 0 {
            format!("  (in cart: {in_cart})")
        } else {
            String::new()
        };
        info!(
            "{:<16} {:<40} {:>10}  {:<22} {:<16} {:.1}*  stock {}{cart_note}",
            product.id.as_str(),
            product.name,
            Price::from_amount(product.price).to_string(),
            product.category,
            product.brand,
            product.rating,
            product.stock
        );
    }
}
