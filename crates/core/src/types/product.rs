//! Catalog product type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as shown on the dashboard, detail view and in carts.
///
/// Both remote catalog records and generated mock products are normalized
/// into this shape. Field names serialize in camelCase to match the
/// persisted cart format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price, never negative.
    pub price: Decimal,
    pub category: String,
    pub description: String,
    /// Image URL.
    pub image: String,
    pub stock: u32,
    pub brand: String,
    /// Rating in `[0, 5]`, one decimal place.
    pub rating: f64,
    pub features: Vec<String>,
    pub gtin: String,
    pub selling_unit: String,
    pub is_local_product: bool,
}

impl Product {
    /// Unit price in the store currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }

    /// Case-insensitive substring match against name or brand.
    ///
    /// An empty term matches every product.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.brand.to_lowercase().contains(&term)
    }

    /// Exact category match. An empty filter matches every product.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        category.is_empty() || self.category == category
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::product;
    use super::*;

    #[test]
    fn test_matches_search_name_and_brand() {
        let mut p = product("a", 10);
        p.name = "Basmati Rice 2".to_string();
        p.brand = "Brand 7".to_string();

        assert!(p.matches_search("rice"));
        assert!(p.matches_search("BRAND 7"));
        assert!(p.matches_search(""));
        assert!(!p.matches_search("tea"));
    }

    #[test]
    fn test_in_category_is_exact() {
        let mut p = product("a", 10);
        p.category = "ELECTRONICS".to_string();

        assert!(p.in_category("ELECTRONICS"));
        assert!(p.in_category(""));
        assert!(!p.in_category("electronics"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(product("a", 10)).unwrap();
        assert!(json.get("sellingUnit").is_some());
        assert!(json.get("isLocalProduct").is_some());
        assert_eq!(json["price"], "10");
    }
}
