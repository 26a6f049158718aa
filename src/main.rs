//! Catalog Census
//!
//! Lists the retail catalog's categories for both gender segments, counts the
//! products in each one and writes the result to `catalog_<DD-MM-YYYY>.xlsx`.

use anyhow::Context;
use chrono::Local;
use tracing::info;

mod client;
mod collect;
mod config;
mod domain;
mod export;

use crate::client::CatalogClient;
use crate::collect::CatalogCollector;
use crate::config::Settings;
use crate::export::SpreadsheetExporter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive("catalog_census=info".parse()?)
                .from_env_lossy(),
        )
        .init();

    run().await
}

async fn run() -> anyhow::Result<()> {
    let settings = Settings::load().context("invalid configuration")?;

    info!(
        "Starting catalog census v{} against {}",
        env!("CARGO_PKG_VERSION"),
        settings.api_base()
    );

    let client = CatalogClient::new(&settings).context("failed to build HTTP client")?;
    let collection = CatalogCollector::new(&client, &settings).run().await?;

    let exporter = SpreadsheetExporter::new(&settings.output_dir, settings.legacy_column_names);
    let path = exporter
        .export(&collection.rows, Local::now().date_naive())
        .context("failed to write spreadsheet")?;

    let report = &collection.report;
    info!(
        path = %path.display(),
        categories = report.categories,
        items = report.total_items,
        pages = report.pages_fetched,
        capped = report.capped_categories,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Catalog census complete"
    );
    Ok(())
}
