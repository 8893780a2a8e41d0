//! Wire types for the remote catalog API.
//!
//! Every field is optional: upstream records routinely omit attributes, and
//! numeric fields arrive either as JSON numbers or numeric strings, so those
//! are kept as raw [`serde_json::Value`]s and interpreted during conversion.

use serde::Deserialize;
use serde_json::Value;

/// Body of `GET /cms/products`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCatalogResponse {
    pub products: Option<Vec<RemoteProduct>>,
    pub total_results: Option<Value>,
    pub current_page: Option<Value>,
    pub total_pages: Option<Value>,
    pub current_page_results: Option<Value>,
}

/// A product record as the catalog API returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteProduct {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub mrp: Option<RemoteMrp>,
    pub main_category: Option<String>,
    pub description: Option<String>,
    pub derived_description: Option<String>,
    pub images: Option<RemoteImages>,
    pub brand: Option<String>,
    pub company_detail: Option<RemoteCompanyDetail>,
    pub gtin: Option<Value>,
    #[serde(rename = "sellingUnit")]
    pub selling_unit: Option<String>,
    #[serde(rename = "isLocalProduct")]
    pub is_local_product: Option<Value>,
}

/// Maximum retail price block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteMrp {
    pub mrp: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteImages {
    pub front: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteCompanyDetail {
    pub brand: Option<String>,
}
