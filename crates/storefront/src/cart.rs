//! Persisted per-user cart operations.
//!
//! Every operation takes the active user explicitly. Without one, mutations
//! are no-ops and queries report zero. Each mutation writes the whole
//! [`CartCollection`] back under [`keys::USER_CARTS`].

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::{Cart, CartCollection, CartLine, Price, Product, ProductId, UserId};
use tracing::{debug, info};

use crate::storage::{KeyValueStore, keys};

/// Confirmation details of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    /// Units across all lines.
    pub item_count: u64,
    pub total: Decimal,
}

impl OrderSummary {
    /// Order total as a display price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::from_amount(self.total)
    }
}

/// Cart collection bound to the store it persists to.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    carts: CartCollection,
    store: KeyValueStore,
}

impl CartStore {
    /// Restore carts from `store`, starting empty if none were saved.
    #[must_use]
    pub fn load(store: KeyValueStore) -> Self {
        let carts = store.get::<CartCollection>(keys::USER_CARTS).unwrap_or_default();
        debug!(users = carts.len(), "Restored carts");
        Self { carts, store }
    }

    /// All users' carts.
    #[must_use]
    pub const fn collection(&self) -> &CartCollection {
        &self.carts
    }

    /// The user's cart lines, empty without a user.
    #[must_use]
    pub fn items(&self, user: Option<UserId>) -> &[CartLine] {
        self.cart(user).map(Cart::lines).unwrap_or_default()
    }

    /// Add one unit of `product` to the user's cart.
    pub fn add_to_cart(&mut self, user: Option<UserId>, product: &Product) {
        let Some(user) = user else {
            return;
        };
        self.carts.cart_mut(user).add(product);
        debug!(%user, product_id = %product.id, "Added to cart");
        self.persist();
    }

    /// Set the quantity of an existing line; 0 removes it. Absent products
    /// are ignored.
    pub fn update_cart_item_quantity(
        &mut self,
        user: Option<UserId>,
        product_id: &ProductId,
        quantity: u32,
    ) {
        let Some(user) = user else {
            return;
        };
        let cart = self.carts.cart_mut(user);
        let changed = if quantity == 0 {
            cart.remove(product_id)
        } else {
            cart.set_quantity(product_id, quantity)
        };
        if changed {
            self.persist();
        }
    }

    /// Remove the line for `product_id`, if present.
    pub fn remove_from_cart(&mut self, user: Option<UserId>, product_id: &ProductId) {
        let Some(user) = user else {
            return;
        };
        if self.carts.cart_mut(user).remove(product_id) {
            self.persist();
        }
    }

    /// Quantity of `product_id` in the user's cart, 0 if absent.
    #[must_use]
    pub fn get_cart_item_quantity(&self, user: Option<UserId>, product_id: &ProductId) -> u32 {
        self.cart(user).map_or(0, |cart| cart.quantity_of(product_id))
    }

    /// Sum of `price × quantity` over the user's cart.
    #[must_use]
    pub fn get_total_cart_value(&self, user: Option<UserId>) -> Decimal {
        self.cart(user).map_or(Decimal::ZERO, Cart::total_value)
    }

    /// Sum of quantities over the user's cart.
    #[must_use]
    pub fn get_cart_items_count(&self, user: Option<UserId>) -> u64 {
        self.cart(user).map_or(0, Cart::item_count)
    }

    /// Clear the user's cart and report what was ordered.
    ///
    /// Returns `None` without a user or when the cart is already empty. The
    /// user keeps an (empty) cart entry.
    pub fn place_order(&mut self, user: Option<UserId>) -> Option<OrderSummary> {
        let user = user?;
        let cart = self.carts.cart_mut(user);
        if cart.is_empty() {
            return None;
        }

        let summary = OrderSummary {
            item_count: cart.item_count(),
            total: cart.total_value(),
        };
        cart.clear();
        info!(%user, items = summary.item_count, total = %summary.total, "Order placed");
        self.persist();
        Some(summary)
    }

    fn cart(&self, user: Option<UserId>) -> Option<&Cart> {
        user.and_then(|user| self.carts.get(user))
    }

    fn persist(&self) {
        self.store.set(keys::USER_CARTS, &self.carts);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::mock_catalog;

    const ALICE: Option<UserId> = Some(UserId::new(1));
    const BOB: Option<UserId> = Some(UserId::new(2));

    fn product(index: usize) -> Product {
        mock_catalog()[index].clone()
    }

    #[test]
    fn test_repeated_add_increments_single_line() {
        let mut carts = CartStore::default();
        let p = product(0);
        for _ in 0..3 {
            carts.add_to_cart(ALICE, &p);
        }

        assert_eq!(carts.get_cart_items_count(ALICE), 3);
        assert_eq!(carts.items(ALICE).len(), 1);
        assert_eq!(carts.get_cart_item_quantity(ALICE, &p.id), 3);
    }

    #[test]
    fn test_operations_without_user_are_noops() {
        let mut carts = CartStore::default();
        let p = product(0);
        carts.add_to_cart(None, &p);
        carts.update_cart_item_quantity(None, &p.id, 5);
        carts.remove_from_cart(None, &p.id);

        assert!(carts.collection().is_empty());
        assert_eq!(carts.get_cart_items_count(None), 0);
        assert_eq!(carts.get_total_cart_value(None), Decimal::ZERO);
        assert!(carts.items(None).is_empty());
        assert!(carts.place_order(None).is_none());
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let mut carts = CartStore::default();
        let p = product(3);
        carts.add_to_cart(ALICE, &p);
        carts.update_cart_item_quantity(ALICE, &p.id, 0);

        assert_eq!(carts.get_cart_item_quantity(ALICE, &p.id), 0);
        assert!(carts.items(ALICE).is_empty());
    }

    #[test]
    fn test_update_absent_product_is_ignored() {
        let mut carts = CartStore::default();
        carts.add_to_cart(ALICE, &product(1));
        carts.update_cart_item_quantity(ALICE, &product(2).id, 4);
        assert_eq!(carts.items(ALICE).len(), 1);
        assert_eq!(carts.get_cart_items_count(ALICE), 1);
    }

    #[test]
    fn test_totals() {
        let mut carts = CartStore::default();
        let a = product(0);
        let b = product(1);
        carts.add_to_cart(ALICE, &a);
        carts.add_to_cart(ALICE, &b);
        carts.update_cart_item_quantity(ALICE, &b.id, 3);

        assert_eq!(
            carts.get_total_cart_value(ALICE),
            a.price + b.price * Decimal::from(3)
        );
        assert_eq!(carts.get_cart_items_count(ALICE), 4);
    }

    #[test]
    fn test_carts_are_per_user() {
        let mut carts = CartStore::default();
        let p = product(0);
        carts.add_to_cart(ALICE, &p);
        carts.add_to_cart(BOB, &p);
        carts.add_to_cart(BOB, &p);

        assert_eq!(carts.get_cart_items_count(ALICE), 1);
        assert_eq!(carts.get_cart_items_count(BOB), 2);
    }

    #[test]
    fn test_place_order_clears_and_keeps_entry() {
        let mut carts = CartStore::default();
        let p = product(0);
        carts.add_to_cart(ALICE, &p);
        carts.add_to_cart(ALICE, &p);

        let summary = carts.place_order(ALICE).unwrap();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total, p.price * Decimal::from(2));

        assert!(carts.items(ALICE).is_empty());
        assert!(carts.collection().contains(UserId::new(1)));

        carts.add_to_cart(ALICE, &p);
        assert_eq!(carts.get_cart_items_count(ALICE), 1);
    }

    #[test]
    fn test_place_order_on_empty_cart() {
        let mut carts = CartStore::default();
        assert!(carts.place_order(ALICE).is_none());
    }

    #[test]
    fn test_mutations_persist() {
        let store = KeyValueStore::in_memory();
        let mut carts = CartStore::load(store.clone());
        let p = product(7);
        carts.add_to_cart(ALICE, &p);
        carts.add_to_cart(ALICE, &p);

        let restored = CartStore::load(store.clone());
        assert_eq!(restored.get_cart_item_quantity(ALICE, &p.id), 2);

        carts.remove_from_cart(ALICE, &p.id);
        let restored = CartStore::load(store);
        assert_eq!(restored.get_cart_item_quantity(ALICE, &p.id), 0);
        assert!(restored.collection().contains(UserId::new(1)));
    }
}
