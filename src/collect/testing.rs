//! In-memory [`CatalogApi`] double for collector tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::client::models::Section;
use crate::client::{ApiError, ApiResult, CatalogApi, ProductPage};
use crate::domain::Gender;

pub fn section(id: i64, parent: i64, name: &str, path: &str) -> Section {
    Section {
        id,
        parent_iblock_id: parent,
        name: name.to_string(),
        section_page_url: path.to_string(),
    }
}

/// Scripted catalog. Past the end of a section's script the last page
/// repeats; unscripted sections are exhausted immediately.
#[derive(Default)]
pub struct FakeCatalog {
    sections: HashMap<Gender, Vec<Section>>,
    pages: HashMap<i64, Vec<ProductPage>>,
    failing_listings: HashSet<Gender>,
    failing_sections: HashSet<i64>,
    listing_calls: Mutex<Vec<Gender>>,
    page_calls: Mutex<Vec<(i64, Gender, u32)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sections(mut self, gender: Gender, sections: Vec<Section>) -> Self {
        self.sections.insert(gender, sections);
        self
    }

    pub fn with_pages(mut self, section_id: i64, pages: Vec<ProductPage>) -> Self {
        self.pages.insert(section_id, pages);
        self
    }

    pub fn failing_listing(mut self, gender: Gender) -> Self {
        self.failing_listings.insert(gender);
        self
    }

    pub fn failing_section(mut self, section_id: i64) -> Self {
        self.failing_sections.insert(section_id);
        self
    }

    pub fn listed_genders(&self) -> Vec<Gender> {
        self.listing_calls.lock().unwrap().clone()
    }

    pub fn requested_pages(&self, section_id: i64) -> Vec<u32> {
        self.page_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _, _)| *id == section_id)
            .map(|(_, _, page)| *page)
            .collect()
    }

    /// Gender of the first page request of each section, in request order
    pub fn page_genders(&self) -> Vec<(i64, Gender)> {
        self.page_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, _, page)| *page == 1)
            .map(|(id, gender, _)| (*id, *gender))
            .collect()
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_sections(&self, gender: Gender) -> ApiResult<Vec<Section>> {
        self.listing_calls.lock().unwrap().push(gender);
        if self.failing_listings.contains(&gender) {
            return Err(ApiError::MissingData {
                endpoint: "/catalog/sections/get/".to_string(),
            });
        }
        Ok(self.sections.get(&gender).cloned().unwrap_or_default())
    }

    async fn product_page(&self, section_id: i64, gender: Gender, page: u32) -> ApiResult<ProductPage> {
        self.page_calls.lock().unwrap().push((section_id, gender, page));
        if self.failing_sections.contains(&section_id) {
            return Err(ApiError::Status {
                status: 500,
                message: "internal error".to_string(),
            });
        }
        let script = match self.pages.get(&section_id) {
            Some(script) if !script.is_empty() => script,
            _ => return Ok(ProductPage::Exhausted),
        };
        let idx = (page as usize - 1).min(script.len() - 1);
        Ok(script[idx])
    }
}
