//! Deterministic offline catalog.
//!
//! Used whenever the remote catalog cannot be reached or answers with
//! something unusable. Product `i` is always generated the same way: its
//! random attributes come from an RNG seeded with `i`.

use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use shopfront_core::{Product, ProductId};

use super::conversions::{placeholder_image, round_rating};
use super::{CatalogPage, CatalogRequest, CatalogSource};

/// Number of products in the mock catalog.
pub const MOCK_CATALOG_SIZE: usize = 200;

/// Mock categories, assigned round-robin by index.
pub const MOCK_CATEGORIES: [&str; 8] = [
    "HOUSE HOLD NEEDS",
    "CLEANING & HOUSEHOLD",
    "ELECTRONICS",
    "FOOD & BEVERAGES",
    "PERSONAL CARE",
    "HOME & KITCHEN",
    "SPORTS & FITNESS",
    "BOOKS & STATIONERY",
];

const HOUSEHOLD: [&str; 10] = [
    "KOLORR ROYAL PEDAL BIN LARGE",
    "RTN DLX BUCKET 18L",
    "RTN ROYAL TUB NO:1",
    "RTN BASIN NO:16",
    "RN SUPER SAVER BUCKET 25LTR",
    "Plastic Storage Container",
    "Laundry Basket",
    "Dustbin with Lid",
    "Water Bottle",
    "Food Container",
];

const ELECTRONICS: [&str; 10] = [
    "Wireless Bluetooth Headphones",
    "Smart Watch Fitness Tracker",
    "LED Desk Lamp",
    "Power Bank 10000mAh",
    "Bluetooth Speaker",
    "USB Cable",
    "Phone Stand",
    "Wireless Charger",
    "Tablet Holder",
    "Cable Organizer",
];

const FOOD: [&str; 10] = [
    "Organic Rice 5KG",
    "Premium Tea Leaves",
    "Fresh Coffee Beans",
    "Cooking Oil 1L",
    "Basmati Rice",
    "Wheat Flour",
    "Sugar 1KG",
    "Salt 1KG",
    "Spice Mix",
    "Honey 500g",
];

const PERSONAL_CARE: [&str; 10] = [
    "Premium Face Wash",
    "Moisturizing Lotion",
    "Shampoo 400ml",
    "Body Soap",
    "Toothbrush Set",
    "Hand Sanitizer",
    "Face Cream",
    "Body Lotion",
    "Hair Oil",
    "Sunscreen",
];

const MOCK_FEATURES: [&str; 5] = [
    "High Quality Materials",
    "Long Lasting",
    "Easy to Use",
    "Excellent Value",
    "Eco-Friendly",
];

static ALL_NAMES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    HOUSEHOLD
        .iter()
        .chain(&ELECTRONICS)
        .chain(&FOOD)
        .chain(&PERSONAL_CARE)
        .copied()
        .collect()
});

static MOCK_CATALOG: LazyLock<Vec<Product>> =
    LazyLock::new(|| (0..MOCK_CATALOG_SIZE).map(mock_product).collect());

/// The full mock catalog, in index order.
#[must_use]
pub fn mock_catalog() -> &'static [Product] {
    &MOCK_CATALOG
}

/// Look up a mock product by id.
#[must_use]
pub fn find_mock_product(id: &ProductId) -> Option<&'static Product> {
    if !id.is_mock() {
        return None;
    }
    MOCK_CATALOG.iter().find(|product| &product.id == id)
}

/// Filter and paginate the mock catalog the way the remote API would.
#[must_use]
pub fn mock_page(request: &CatalogRequest) -> CatalogPage {
    let filtered: Vec<&Product> = MOCK_CATALOG
        .iter()
        .filter(|product| product.matches_search(&request.search))
        .filter(|product| product.in_category(&request.category))
        .collect();

    let limit = request.limit as usize;
    let start = (request.page.max(1) as usize - 1).saturating_mul(limit);
    let products: Vec<Product> = filtered
        .iter()
        .skip(start)
        .take(limit)
        .map(|product| (*product).clone())
        .collect();

    let total = u32::try_from(filtered.len()).unwrap_or(u32::MAX);
    CatalogPage {
        current_page_results: u32::try_from(products.len()).unwrap_or(u32::MAX),
        products,
        total: u64::from(total),
        page: request.page,
        total_pages: total.div_ceil(request.limit),
        source: CatalogSource::Mock,
    }
}

/// Generate the mock product at `index`.
fn mock_product(index: usize) -> Product {
    let mut rng = StdRng::seed_from_u64(index as u64);

    let category = MOCK_CATEGORIES[index % MOCK_CATEGORIES.len()];
    let base_name = match category {
        "HOUSE HOLD NEEDS" | "CLEANING & HOUSEHOLD" => HOUSEHOLD[index % HOUSEHOLD.len()],
        "ELECTRONICS" => ELECTRONICS[index % ELECTRONICS.len()],
        "FOOD & BEVERAGES" => FOOD[index % FOOD.len()],
        "PERSONAL CARE" => PERSONAL_CARE[index % PERSONAL_CARE.len()],
        _ => ALL_NAMES[index % ALL_NAMES.len()],
    };

    Product {
        id: ProductId::mock(index),
        name: format!("{base_name} {}", index / ALL_NAMES.len() + 1),
        price: Decimal::from(rng.random_range(10_i64..510)),
        category: category.to_string(),
        description: format!(
            "High-quality {} with excellent features and premium quality. \
             Perfect for daily use with long-lasting durability.",
            base_name.to_lowercase()
        ),
        image: placeholder_image(&(index + 1).to_string()),
        stock: rng.random_range(1..=100),
        brand: format!("Brand {}", index / 10 + 1),
        rating: round_rating(rng.random::<f64>() * 5.0),
        features: MOCK_FEATURES.iter().map(ToString::to_string).collect(),
        gtin: format!("82541{index:07}"),
        selling_unit: "nos".to_string(),
        is_local_product: rng.random::<f64>() > 0.3,
    }
}
