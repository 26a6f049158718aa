//! Catalog collection
//!
//! Runs the listing pass then the counting pass against a [`CatalogApi`] and
//! summarizes the outcome.

pub mod counter;
pub mod lister;
#[cfg(test)]
pub(crate) mod testing;

use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, instrument};

use crate::client::{ApiError, CatalogApi};
use crate::config::Settings;
use crate::domain::CountedCategory;

use counter::count_items;
use lister::list_catalogs;

/// Errors that abort a collection run
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Catalog listing failed")]
    Listing(#[source] ApiError),

    #[error("Item counting failed")]
    Counting(#[source] ApiError),
}

/// Summary of a collection run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionReport {
    pub categories: usize,
    pub total_items: u64,
    pub pages_fetched: u64,
    /// Categories whose pagination hit the page cap
    pub capped_categories: usize,
    pub elapsed: Duration,
}

impl CollectionReport {
    fn from_rows(rows: &[CountedCategory], elapsed: Duration) -> Self {
        CollectionReport {
            categories: rows.len(),
            total_items: rows.iter().map(|r| r.item_count).sum(),
            pages_fetched: rows.iter().map(|r| r.pages_fetched as u64).sum(),
            capped_categories: rows.iter().filter(|r| r.capped).count(),
            elapsed,
        }
    }
}

/// Rows ready for export plus their summary
#[derive(Debug)]
pub struct Collection {
    pub rows: Vec<CountedCategory>,
    pub report: CollectionReport,
}

/// Drives one listing + counting run
pub struct CatalogCollector<'a, A: CatalogApi + ?Sized> {
    api: &'a A,
    public_host: &'a str,
    max_pages: u32,
}

impl<'a, A: CatalogApi + ?Sized> CatalogCollector<'a, A> {
    pub fn new(api: &'a A, settings: &'a Settings) -> Self {
        CatalogCollector {
            api,
            public_host: &settings.host,
            max_pages: settings.max_pages,
        }
    }

    #[instrument(skip_all, fields(max_pages = self.max_pages))]
    pub async fn run(&self) -> Result<Collection, CollectError> {
        let started = Instant::now();

        let records = list_catalogs(self.api, self.public_host)
            .await
            .map_err(CollectError::Listing)?;
        let rows = count_items(self.api, records, self.max_pages)
            .await
            .map_err(CollectError::Counting)?;

        let report = CollectionReport::from_rows(&rows, started.elapsed());
        info!(
            categories = report.categories,
            items = report.total_items,
            pages = report.pages_fetched,
            capped = report.capped_categories,
            "Collection finished"
        );

        Ok(Collection { rows, report })
    }
}
