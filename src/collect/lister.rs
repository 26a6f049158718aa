//! Catalog listing pass
//!
//! Fetches the section list of every gender segment and normalizes it into
//! [`CategoryRecord`]s.

use chrono::Local;
use tracing::{debug, info};

use crate::client::{ApiResult, CatalogApi};
use crate::domain::{CategoryRecord, Gender};

/// List the categories of all gender segments.
///
/// Mens records come first, then womens; within a segment the API order is
/// kept. Each record is stamped with the time it was built.
pub async fn list_catalogs<A>(api: &A, public_host: &str) -> ApiResult<Vec<CategoryRecord>>
where
    A: CatalogApi + ?Sized,
{
    let mut records = Vec::new();

    for gender in Gender::ALL {
        let sections = api.list_sections(gender).await?;
        info!(gender = %gender, categories = sections.len(), "Listed catalogs");

        for section in sections {
            debug!(gender = %gender, id = section.id, name = %section.name, "Catalog");
            records.push(CategoryRecord::new(
                gender,
                section.id,
                section.parent_iblock_id,
                section.name,
                public_host,
                &section.section_page_url,
                Local::now(),
            ));
        }
    }

    info!(total = records.len(), "Collected all catalogs");
    Ok(records)
}
