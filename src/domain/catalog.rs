//! Catalog Domain Models
//!
//! Provider-agnostic rows of the working dataset: listed categories and
//! categories with their counted items.

use chrono::{DateTime, Local};

/// Display format of the collection timestamp (`DD.MM.YYYY HH:MM:SS`)
pub const UPDATED_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

// ============================================================================
// Gender Segments
// ============================================================================

/// Top-level partition of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Mens,
    Womens,
}

impl Gender {
    /// Segments in collection order
    pub const ALL: [Gender; 2] = [Gender::Mens, Gender::Womens];

    /// String code used by the section listing endpoint
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Mens => "mens",
            Gender::Womens => "womens",
        }
    }

    /// Numeric code used by the product pagination endpoint
    pub fn numeric_code(&self) -> u32 {
        match self {
            Gender::Mens => 36360,
            Gender::Womens => 36361,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Records
// ============================================================================

/// A category as listed by the API, before its items are counted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub gender: Gender,
    /// Unique within a gender segment only
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    /// Public host followed by the API-provided page path
    pub url: String,
    /// Collection time, formatted with [`UPDATED_FORMAT`]
    pub updated: String,
}

impl CategoryRecord {
    /// Build a record, joining `public_host` and `page_path` verbatim
    pub fn new(
        gender: Gender,
        id: i64,
        parent_id: i64,
        name: impl Into<String>,
        public_host: &str,
        page_path: &str,
        collected_at: DateTime<Local>,
    ) -> Self {
        CategoryRecord {
            gender,
            id,
            parent_id,
            name: name.into(),
            url: format!("{public_host}{page_path}"),
            updated: collected_at.format(UPDATED_FORMAT).to_string(),
        }
    }

    /// Attach the result of the counting pass
    pub fn counted(self, item_count: u64, pages_fetched: u32, capped: bool) -> CountedCategory {
        CountedCategory {
            record: self,
            item_count,
            pages_fetched,
            capped,
        }
    }
}

/// A category with its item count; the only row type the exporter accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountedCategory {
    pub record: CategoryRecord,
    pub item_count: u64,
    /// Product pages requested for this category
    pub pages_fetched: u32,
    /// Pagination stopped at the page cap rather than on exhaustion
    pub capped: bool,
}
