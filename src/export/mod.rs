//! Spreadsheet export
//!
//! Writes counted categories to `catalog_<DD-MM-YYYY>.xlsx`, one row per
//! category under a fixed header.

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::domain::CountedCategory;

/// Header spellings consumed by existing reports
pub const LEGACY_COLUMNS: [&str; 7] = [
    "gender", "id", "parrent_id", "name", "url", "updated", "items_count",
];

pub const COLUMNS: [&str; 7] = [
    "gender", "id", "parent_id", "name", "url", "updated", "item_count",
];

const SHEET_NAME: &str = "catalog";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output file name for a run on `date`
pub fn file_name(date: NaiveDate) -> String {
    format!("catalog_{}.xlsx", date.format("%d-%m-%Y"))
}

/// Writes the census spreadsheet
#[derive(Debug, Clone)]
pub struct SpreadsheetExporter {
    output_dir: PathBuf,
    columns: [&'static str; 7],
}

impl SpreadsheetExporter {
    pub fn new(output_dir: impl Into<PathBuf>, legacy_column_names: bool) -> Self {
        SpreadsheetExporter {
            output_dir: output_dir.into(),
            columns: if legacy_column_names { LEGACY_COLUMNS } else { COLUMNS },
        }
    }

    pub fn columns(&self) -> &[&'static str; 7] {
        &self.columns
    }

    /// Write `rows` for a run on `date`, replacing any file from the same day
    pub fn export(&self, rows: &[CountedCategory], date: NaiveDate) -> Result<PathBuf, ExportError> {
        ensure_dir(&self.output_dir)?;
        let path = self.output_dir.join(file_name(date));

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        self.write_sheet(sheet, rows)?;
        workbook.save(&path)?;

        info!(path = %path.display(), rows = rows.len(), "Exported catalog spreadsheet");
        Ok(path)
    }

    fn write_sheet(&self, sheet: &mut Worksheet, rows: &[CountedCategory]) -> Result<(), XlsxError> {
        let bold = Format::new().set_bold();
        for (col, title) in self.columns.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &bold)?;
        }
        sheet.set_freeze_panes(1, 0)?;

        for (idx, row) in rows.iter().enumerate() {
            let r = idx as u32 + 1;
            let record = &row.record;
            sheet.write_string(r, 0, record.gender.code())?;
            sheet.write_number(r, 1, record.id as f64)?;
            sheet.write_number(r, 2, record.parent_id as f64)?;
            sheet.write_string(r, 3, &record.name)?;
            sheet.write_string(r, 4, &record.url)?;
            sheet.write_string(r, 5, &record.updated)?;
            sheet.write_number(r, 6, row.item_count as f64)?;
        }

        sheet.autofit();
        Ok(())
    }
}

fn ensure_dir(path: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(path).map_err(|source| ExportError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryRecord, Gender};
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use chrono::Local;
    use std::fs;

    fn read_back(path: &Path) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range.rows().map(|row| row.to_vec()).collect()
    }

    fn text(value: &str) -> Data {
        Data::String(value.to_string())
    }

    fn rows() -> Vec<CountedCategory> {
        vec![
            CategoryRecord::new(Gender::Mens, 1, 0, "Shoes", "https://shop.example", "/shoes/", Local::now())
                .counted(3, 2, false),
            CategoryRecord::new(Gender::Womens, 1, 0, "Bags", "https://shop.example", "/bags/", Local::now())
                .counted(0, 1, false),
        ]
    }

    #[test]
    fn test_file_name_uses_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(file_name(date), "catalog_05-03-2024.xlsx");
    }

    #[test]
    fn test_column_spellings() {
        let legacy = SpreadsheetExporter::new(".", true);
        assert_eq!(legacy.columns()[2], "parrent_id");
        assert_eq!(legacy.columns()[6], "items_count");

        let corrected = SpreadsheetExporter::new(".", false);
        assert_eq!(corrected.columns()[2], "parent_id");
        assert_eq!(corrected.columns()[6], "item_count");
    }

    #[test]
    fn test_export_writes_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let exporter = SpreadsheetExporter::new(dir.path().join("out"), true);

        let path = exporter.export(&rows(), date).unwrap();

        assert_eq!(path, dir.path().join("out").join("catalog_05-03-2024.xlsx"));
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"), "xlsx is a zip container");
    }

    #[test]
    fn test_exported_cells() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let rows = rows();

        let path = SpreadsheetExporter::new(dir.path(), true).export(&rows, date).unwrap();
        let sheet = read_back(&path);

        assert_eq!(sheet.len(), 3);
        assert_eq!(
            sheet[0],
            LEGACY_COLUMNS.iter().map(|c| text(c)).collect::<Vec<_>>()
        );
        assert_eq!(
            sheet[1],
            vec![
                text("mens"),
                Data::Float(1.0),
                Data::Float(0.0),
                text("Shoes"),
                text("https://shop.example/shoes/"),
                text(&rows[0].record.updated),
                Data::Float(3.0),
            ]
        );
        assert_eq!(sheet[2][0], text("womens"));
        assert_eq!(sheet[2][6], Data::Float(0.0));
    }

    #[test]
    fn test_corrected_header_written() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        let path = SpreadsheetExporter::new(dir.path(), false).export(&rows(), date).unwrap();
        let sheet = read_back(&path);

        assert_eq!(sheet[0], COLUMNS.iter().map(|c| text(c)).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_day_export_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let exporter = SpreadsheetExporter::new(dir.path(), true);

        let first = exporter.export(&rows(), date).unwrap();
        let second = exporter.export(&[], date).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(read_back(&second).len(), 1);
    }
}
