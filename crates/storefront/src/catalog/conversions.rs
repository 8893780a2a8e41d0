//! Normalization of remote catalog records into [`Product`]s.
//!
//! Each attribute has a fallback chain. Stock and rating are synthesized on
//! every fetch regardless of upstream data, so repeated fetches of the same
//! product can show different values.

use std::str::FromStr;

use rand::Rng;
use rust_decimal::Decimal;
use serde_json::Value;
use shopfront_core::{Product, ProductId};

use super::types::{RemoteCatalogResponse, RemoteProduct};
use super::{CatalogPage, CatalogRequest, CatalogSource};

const REMOTE_FEATURES: [&str; 4] = [
    "High Quality Materials",
    "Durable Construction",
    "Easy to Use",
    "Value for Money",
];

/// Convert a whole API response, filling pagination metadata the upstream
/// left out.
pub(super) fn convert_catalog_response<R: Rng>(
    response: RemoteCatalogResponse,
    request: &CatalogRequest,
    rng: &mut R,
) -> CatalogPage {
    let products: Vec<Product> = response
        .products
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(position, product)| convert_product(product, position, &mut *rng))
        .collect();

    let count = u32::try_from(products.len()).unwrap_or(u32::MAX);
    let total = positive_u64(response.total_results.as_ref()).unwrap_or(u64::from(count));
    let page = positive_u32(response.current_page.as_ref()).unwrap_or(request.page);
    let total_pages = positive_u32(response.total_pages.as_ref())
        .unwrap_or_else(|| count.div_ceil(request.limit));
    let current_page_results =
        positive_u32(response.current_page_results.as_ref()).unwrap_or(count);

    CatalogPage {
        products,
        total,
        page,
        total_pages,
        current_page_results,
        source: CatalogSource::Remote,
    }
}

/// Convert one remote record. `position` is the record's index on its page
/// and only names records that carry neither an id nor a GTIN.
pub(super) fn convert_product<R: Rng>(
    product: RemoteProduct,
    position: usize,
    rng: &mut R,
) -> Product {
    let gtin = product
        .gtin
        .as_ref()
        .and_then(value_to_string)
        .unwrap_or_default();

    let id = product
        .id
        .as_ref()
        .and_then(value_to_string)
        .or_else(|| (!gtin.is_empty()).then(|| gtin.clone()))
        .unwrap_or_else(|| format!("unknown-{}", position + 1));

    let name = non_empty(product.name).unwrap_or_else(|| "Unnamed Product".to_string());

    let price = product
        .mrp
        .and_then(|mrp| mrp.mrp)
        .as_ref()
        .and_then(value_to_decimal)
        .filter(|price| *price > Decimal::ZERO)
        .unwrap_or_else(|| Decimal::from(rng.random_range(10_i64..510)));

    let description = non_empty(product.description)
        .or_else(|| non_empty(product.derived_description))
        .unwrap_or_else(|| format!("High-quality {name} with excellent features."));

    let image = product
        .images
        .and_then(|images| non_empty(images.front))
        .unwrap_or_else(|| placeholder_image(&gtin));

    let brand = non_empty(product.brand)
        .or_else(|| product.company_detail.and_then(|detail| non_empty(detail.brand)))
        .unwrap_or_else(|| "Generic Brand".to_string());

    let is_local_product = matches!(
        &product.is_local_product,
        Some(Value::String(flag)) if flag == "Yes"
    );

    Product {
        id: ProductId::new(id),
        name,
        price,
        category: non_empty(product.main_category).unwrap_or_else(|| "General".to_string()),
        description,
        image,
        stock: rng.random_range(1..=100),
        brand,
        rating: round_rating(rng.random::<f64>() * 5.0),
        features: REMOTE_FEATURES.iter().map(ToString::to_string).collect(),
        gtin,
        selling_unit: non_empty(product.selling_unit).unwrap_or_else(|| "nos".to_string()),
        is_local_product,
    }
}

/// Placeholder image keyed by a seed (GTIN or mock index).
pub(super) fn placeholder_image(seed: &str) -> String {
    format!("https://picsum.photos/400/400?random={seed}")
}

/// Round to one decimal place.
pub(super) fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn positive_u64(value: Option<&Value>) -> Option<u64> {
    let parsed = match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(truncate)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.filter(|n| *n > 0)
}

fn positive_u32(value: Option<&Value>) -> Option<u32> {
    positive_u64(value).and_then(|n| u32::try_from(n).ok())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // caller checks finite and >= 0
fn truncate(value: f64) -> u64 {
    value.trunc() as u64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    use super::*;

    fn remote(json: Value) -> RemoteProduct {
        serde_json::from_value(json).unwrap()
    }

    fn request() -> CatalogRequest {
        CatalogRequest::new(2, 20, "", "")
    }

    #[test]
    fn test_full_record() {
        let mut rng = StdRng::seed_from_u64(1);
        let product = convert_product(
            remote(json!({
                "id": "p-1",
                "name": "RTN DLX BUCKET 18L",
                "mrp": { "mrp": 149.5 },
                "main_category": "HOUSE HOLD NEEDS",
                "description": "Sturdy bucket",
                "images": { "front": "https://cdn.example.com/front.jpg" },
                "brand": "RTN",
                "gtin": "8904109450013",
                "sellingUnit": "pcs",
                "isLocalProduct": "Yes"
            })),
            0,
            &mut rng,
        );

        assert_eq!(product.id.as_str(), "p-1");
        assert_eq!(product.name, "RTN DLX BUCKET 18L");
        assert_eq!(product.price, Decimal::new(1495, 1));
        assert_eq!(product.category, "HOUSE HOLD NEEDS");
        assert_eq!(product.description, "Sturdy bucket");
        assert_eq!(product.image, "https://cdn.example.com/front.jpg");
        assert_eq!(product.brand, "RTN");
        assert_eq!(product.gtin, "8904109450013");
        assert_eq!(product.selling_unit, "pcs");
        assert!(product.is_local_product);
        assert_eq!(product.features.len(), 4);
    }

    #[test]
    fn test_empty_record_uses_fallbacks() {
        let mut rng = StdRng::seed_from_u64(2);
        let product = convert_product(remote(json!({})), 4, &mut rng);

        assert_eq!(product.id.as_str(), "unknown-5");
        assert_eq!(product.name, "Unnamed Product");
        assert!(product.price >= Decimal::from(10) && product.price < Decimal::from(510));
        assert_eq!(product.category, "General");
        assert_eq!(
            product.description,
            "High-quality Unnamed Product with excellent features."
        );
        assert_eq!(product.image, "https://picsum.photos/400/400?random=");
        assert_eq!(product.brand, "Generic Brand");
        assert_eq!(product.selling_unit, "nos");
        assert!(!product.is_local_product);
    }

    #[test]
    fn test_secondary_fallbacks() {
        let mut rng = StdRng::seed_from_u64(3);
        let product = convert_product(
            remote(json!({
                "id": "",
                "name": "Sugar 1KG",
                "mrp": { "mrp": "0" },
                "derived_description": "Refined sugar",
                "company_detail": { "brand": "Sweet Co" },
                "gtin": 8_901_234_567_890_u64,
                "isLocalProduct": "No"
            })),
            0,
            &mut rng,
        );

        assert_eq!(product.id.as_str(), "8901234567890");
        assert_eq!(product.description, "Refined sugar");
        assert_eq!(product.brand, "Sweet Co");
        assert_eq!(product.image, "https://picsum.photos/400/400?random=8901234567890");
        assert!(product.price >= Decimal::from(10));
        assert!(!product.is_local_product);
    }

    #[test]
    fn test_local_flag_requires_literal_yes() {
        let mut rng = StdRng::seed_from_u64(4);
        for flag in [json!(true), json!("yes"), json!("Y"), json!(1)] {
            let product = convert_product(remote(json!({ "isLocalProduct": flag })), 0, &mut rng);
            assert!(!product.is_local_product);
        }
    }

    #[test]
    fn test_synthesized_fields_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let record = remote(json!({ "name": "x", "stock": 999 }));
            let product = convert_product(record, 0, &mut rng);
            assert!((1..=100).contains(&product.stock));
            assert!((0.0..=5.0).contains(&product.rating));
            assert!((product.rating * 10.0 - (product.rating * 10.0).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_metadata_from_strings() {
        let mut rng = StdRng::seed_from_u64(6);
        let response: RemoteCatalogResponse = serde_json::from_value(json!({
            "products": [{ "id": "a" }, { "id": "b" }],
            "totalResults": "57",
            "currentPage": "2",
            "totalPages": 3,
            "currentPageResults": "2"
        }))
        .unwrap();

        let page = convert_catalog_response(response, &request(), &mut rng);
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.total, 57);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page_results, 2);
        assert_eq!(page.source, CatalogSource::Remote);
    }

    #[test]
    fn test_metadata_fallbacks() {
        let mut rng = StdRng::seed_from_u64(7);
        let response: RemoteCatalogResponse = serde_json::from_value(json!({
            "products": [{ "id": "a" }, { "id": "b" }, { "id": "c" }]
        }))
        .unwrap();

        let page = convert_catalog_response(response, &request(), &mut rng);
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page_results, 3);
    }

    #[test]
    fn test_missing_products_is_empty_page() {
        let mut rng = StdRng::seed_from_u64(8);
        let page = convert_catalog_response(RemoteCatalogResponse::default(), &request(), &mut rng);
        assert!(page.products.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }
}
