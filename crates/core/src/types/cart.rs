//! Per-user carts and their arithmetic.
//!
//! A [`Cart`] is an insertion-ordered list of [`CartLine`]s, unique by
//! product id. A [`CartCollection`] maps each user to their cart; entries are
//! created empty on first reference and are cleared, never removed, when an
//! order is placed.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, UserId};
use super::product::Product;

/// A product in a cart together with its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// One user's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product.id == product_id)
    }

    /// Add one unit of `product`, appending a new line if needed.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            });
        }
    }

    /// Set a line's quantity verbatim. Returns `false` if no such line exists.
    ///
    /// No floor is applied here; callers route non-positive quantities to
    /// [`Cart::remove`].
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        match self
            .lines
            .iter_mut()
            .find(|line| &line.product.id == product_id)
        {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `true` if a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product.id != product_id);
        self.lines.len() != before
    }

    /// Quantity of a product in the cart, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.line(product_id).map_or(0, |line| line.quantity)
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Carts for every user that has referenced one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartCollection {
    carts: BTreeMap<UserId, Cart>,
}

impl CartCollection {
    /// The user's cart, if one has been created.
    #[must_use]
    pub fn get(&self, user_id: UserId) -> Option<&Cart> {
        self.carts.get(&user_id)
    }

    /// The user's cart, created empty on first reference.
    pub fn cart_mut(&mut self, user_id: UserId) -> &mut Cart {
        self.carts.entry(user_id).or_default()
    }

    /// Whether the user has a cart entry (empty or not).
    #[must_use]
    pub fn contains(&self, user_id: UserId) -> bool {
        self.carts.contains_key(&user_id)
    }

    /// Number of users with a cart entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.carts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }
}
