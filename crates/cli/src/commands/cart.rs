//! Cart commands for the signed-in user.

use shopfront_core::{Price, ProductId};
use shopfront_storefront::session::{SessionError, StorefrontSession};
use shopfront_storefront::state::AppState;
use tracing::{info, warn};

use super::browse::resolve_product;

/// Warn and return `false` when nobody is signed in.
fn require_user(session: &StorefrontSession) -> bool {
    if session.current_user().is_none() {
        warn!("Sign in first with `shopfront login <id>`");
        return false;
    }
    true
}

/// List cart lines and totals.
pub fn show(state: &AppState) {
    let session = state.session();
    if !require_user(&session) {
        return;
    }

    let lines = session.current_cart();
    if lines.is_empty() {
        info!("Your cart is empty");
        return;
    }

    for line in lines {
        info!(
            "{:<16} {:<40} {:>3} x {:>10} = {:>10}",
            line.product.id.as_str(),
            line.product.name,
            line.quantity,
            line.product.unit_price().to_string(),
            Price::from_amount(line.line_total()).to_string()
        );
    }
    info!(
        "{} item(s), total {}",
        session.get_cart_items_count(),
        Price::from_amount(session.get_total_cart_value())
    );
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the product cannot be found.
pub async fn add(state: &AppState, product_id: &ProductId) -> Result<(), SessionError> {
    let mut session = state.session();
    if !require_user(&session) {
        return Ok(());
    }

    let product = resolve_product(state, &mut session, product_id).await?;
    session.add_to_cart(&product);
    info!(
        "Added {} (now {} in cart)",
        product.name,
        session.get_cart_item_quantity(&product.id)
    );
    Ok(())
}

/// Set a line's quantity; zero or less removes it.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn set(state: &AppState, product_id: &ProductId, quantity: i64) -> Result<(), SessionError> {
    let mut session = state.session();
    if !require_user(&session) {
        return Ok(());
    }
    ensure_in_cart(&session, product_id)?;

    session.update_cart_item_quantity(product_id, quantity);
    match session.get_cart_item_quantity(product_id) {
        0 => info!("Removed {product_id} from cart"),
        quantity => info!("Set {product_id} to {quantity}"),
    }
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn remove(state: &AppState, product_id: &ProductId) -> Result<(), SessionError> {
    let mut session = state.session();
    if !require_user(&session) {
        return Ok(());
    }
    ensure_in_cart(&session, product_id)?;

    session.remove_from_cart(product_id);
    info!("Removed {product_id} from cart");
    Ok(())
}

/// Place an order for the current cart.
pub fn order(state: &AppState) {
    let mut session = state.session();
    if !require_user(&session) {
        return;
    }

    match session.place_order() {
        Some(summary) => info!(
            "Order placed: {} item(s), total {}",
            summary.item_count,
            summary.total_price()
        ),
        None => warn!("Your cart is empty"),
    }
}

fn ensure_in_cart(session: &StorefrontSession, product_id: &ProductId) -> Result<(), SessionError> {
    if session.get_cart_item_quantity(product_id) == 0 {
        return Err(SessionError::ProductNotFound(product_id.clone()));
    }
    Ok(())
}
