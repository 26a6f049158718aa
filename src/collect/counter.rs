//! Item counting pass

use tracing::{debug, info, warn};

use crate::client::{ApiResult, CatalogApi, ProductPage};
use crate::domain::{CategoryRecord, CountedCategory, Gender};

/// Pagination outcome for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCount {
    pub item_count: u64,
    /// Requests issued, including the one that reported exhaustion
    pub pages_fetched: u32,
    /// Stopped because `max_pages` was reached
    pub capped: bool,
}

/// Page through one section's products and sum the items per page.
///
/// Stops at the first [`ProductPage::Exhausted`] or after `max_pages`
/// requests. Empty pages add nothing but do not stop the loop.
pub async fn count_section<A>(
    api: &A,
    section_id: i64,
    gender: Gender,
    max_pages: u32,
) -> ApiResult<PageCount>
where
    A: CatalogApi + ?Sized,
{
    let mut item_count = 0;

    for page in 1..=max_pages {
        match api.product_page(section_id, gender, page).await? {
            ProductPage::Exhausted => {
                return Ok(PageCount {
                    item_count,
                    pages_fetched: page,
                    capped: false,
                });
            }
            ProductPage::Items(n) => {
                debug!(section_id, page, items = n, "Product page");
                item_count += n;
            }
        }
    }

    warn!(section_id, gender = %gender, max_pages, "Page cap reached before the last page");
    Ok(PageCount {
        item_count,
        pages_fetched: max_pages,
        capped: true,
    })
}

/// Count the items of every record, in order
pub async fn count_items<A>(
    api: &A,
    records: Vec<CategoryRecord>,
    max_pages: u32,
) -> ApiResult<Vec<CountedCategory>>
where
    A: CatalogApi + ?Sized,
{
    let mut counted = Vec::with_capacity(records.len());

    for record in records {
        let pages = count_section(api, record.id, record.gender, max_pages).await?;
        info!(
            gender = %record.gender,
            id = record.id,
            name = %record.name,
            items = pages.item_count,
            pages = pages.pages_fetched,
            "Counted items in catalog"
        );
        counted.push(record.counted(pages.item_count, pages.pages_fetched, pages.capped));
    }

    info!(catalogs = counted.len(), "Counted items in all catalogs");
    Ok(counted)
}
