//! Retail Catalog API Integration Module
//!
//! Typed access to the catalog's section listing and product pagination
//! endpoints. Everything above this module works against the [`CatalogApi`]
//! trait.

pub mod traits;
pub mod http_client;
pub mod models;
mod catalog_client;

pub use traits::{ApiError, ApiResult, CatalogApi, ProductPage};
pub use catalog_client::CatalogClient;
