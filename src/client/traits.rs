//! Catalog API trait definitions
//!
//! The collector talks to the retail catalog only through [`CatalogApi`], so
//! the listing and counting passes can run against the live HTTP client or an
//! in-memory double.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Gender;
use super::models::Section;

// ============================================================================
// Error Types
// ============================================================================

/// Catalog API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Response from {endpoint} has no `data` field")]
    MissingData { endpoint: String },

    #[error("Client configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for catalog API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Pagination
// ============================================================================

/// Outcome of requesting one page of a category's products
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductPage {
    /// The page carried a `data` field holding this many items (possibly 0)
    Items(u64),
    /// The response had no `data` field: there are no more pages
    Exhausted,
}

// ============================================================================
// API Trait
// ============================================================================

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List every section of a gender segment, in API order
    async fn list_sections(&self, gender: Gender) -> ApiResult<Vec<Section>>;

    /// Fetch one page (1-indexed) of a section's products
    async fn product_page(&self, section_id: i64, gender: Gender, page: u32) -> ApiResult<ProductPage>;
}
