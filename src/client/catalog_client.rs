//! Retail Catalog API Client Implementation
//!
//! Implements [`CatalogApi`] over HTTP against the two catalog endpoints.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Settings;
use crate::domain::Gender;
use super::http_client::ThrottledClient;
use super::models::*;
use super::traits::{ApiError, ApiResult, CatalogApi, ProductPage};

const SECTIONS_PATH: &str = "/catalog/sections/get/";
const PRODUCTS_PATH: &str = "/catalog/products/getBySectionId/";

/// Catalog API client
pub struct CatalogClient {
    client: ThrottledClient,

    /// API base URL without trailing slash
    base_url: String,
}

impl CatalogClient {
    /// Create a client from validated settings
    pub fn new(settings: &Settings) -> ApiResult<Self> {
        Ok(CatalogClient {
            client: ThrottledClient::new(settings)?,
            base_url: settings.api_base().to_string(),
        })
    }

    fn sections_url(&self) -> String {
        format!("{}{}", self.base_url, SECTIONS_PATH)
    }

    fn products_url(&self, section_id: i64) -> String {
        format!("{}{}{}/", self.base_url, PRODUCTS_PATH, section_id)
    }

    /// POST a JSON body and parse the JSON response
    async fn post<B, T>(&self, url: &str, body: &B) -> ApiResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(url = %url, "Catalog API request");

        let response = self.client.post_json(url, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::Parse(format!("JSON parse error: {} - Body: {}", e, truncate(&text, 500)))
        })
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_sections(&self, gender: Gender) -> ApiResult<Vec<Section>> {
        let url = self.sections_url();
        let body: serde_json::Value = self
            .post(&url, &SectionsRequest { gender_code: gender.code() })
            .await?;

        if body.get("data").is_none() {
            return Err(ApiError::MissingData { endpoint: url });
        }

        let response: SectionsResponse = serde_json::from_value(body)
            .map_err(|e| ApiError::Parse(format!("malformed section list: {e}")))?;
        Ok(response.data)
    }

    async fn product_page(&self, section_id: i64, gender: Gender, page: u32) -> ApiResult<ProductPage> {
        let body: serde_json::Value = self
            .post(
                &self.products_url(section_id),
                &ProductsRequest {
                    page,
                    gender: gender.numeric_code(),
                },
            )
            .await?;

        classify_products_body(&body)
    }
}
