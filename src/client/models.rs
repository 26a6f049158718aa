//! Catalog API Request/Response Models
//!
//! Wire shapes of the two catalog endpoints. Section entries are mapped to
//! [`CategoryRecord`](crate::domain::CategoryRecord) by the lister.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::{ApiError, ApiResult, ProductPage};

// ============================================================================
// Sections
// ============================================================================

/// Body of `POST /catalog/sections/get/`
#[derive(Debug, Serialize)]
pub struct SectionsRequest<'a> {
    pub gender_code: &'a str,
}

/// Listing response; `data` is required
#[derive(Debug, Deserialize)]
pub struct SectionsResponse {
    pub data: Vec<Section>,
}

/// One category as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub parent_iblock_id: i64,
    pub name: String,
    pub section_page_url: String,
}

// ============================================================================
// Products
// ============================================================================

/// Body of `POST /catalog/products/getBySectionId/{id}/`
#[derive(Debug, Serialize)]
pub struct ProductsRequest {
    pub page: u32,
    pub gender: u32,
}

/// Classify a products response body.
///
/// A body without `data` means pagination is over. Otherwise `data` counts
/// as its number of entries. `null`, `false`, `0` and `""` are empty pages.
/// Objects are counted too: PHP backends serialize sparse arrays as JSON
/// objects. A non-empty string counts its characters; `true` and non-zero
/// numbers have no length and are rejected.
pub fn classify_products_body(body: &Value) -> ApiResult<ProductPage> {
    let Some(data) = body.get("data") else {
        return Ok(ProductPage::Exhausted);
    };

    match data {
        Value::Array(items) => Ok(ProductPage::Items(items.len() as u64)),
        Value::Object(items) => Ok(ProductPage::Items(items.len() as u64)),
        Value::String(text) => Ok(ProductPage::Items(text.chars().count() as u64)),
        Value::Null | Value::Bool(false) => Ok(ProductPage::Items(0)),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(ProductPage::Items(0)),
        other => Err(ApiError::Parse(format!(
            "unexpected products `data` value: {}",
            truncate(&other.to_string(), 200)
        ))),
    }
}

/// Cap a body excerpt for error messages
pub(crate) fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
