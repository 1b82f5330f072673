//! CSV input for the catalog import.
//!
//! Columns are looked up by header name; unknown columns are ignored and
//! empty cells count as missing.
//!
//! | column | required | value |
//! |---|---|---|
//! | `stl_file` | yes | path (relative to the data directory) or URL |
//! | `productId` | yes | integer |
//! | `quantity` | no | positive integer, default 1 |
//! | `unit` | no | `mm` (default) or `inch` |
//! | `preferredDueDate` | no | `YYYY-MM-DD` |
//! | `attachments` | no | space-separated paths or URLs |
//! | `title` | no | switches to detailed catalog creation |
//! | `technologyId` | with `title` | integer |
//! | `partnerId` | no | integer |
//! | `reference` | no | record key when present |
//! | `shortDescription`, `detailedDescription` | no | text |
//! | `status` | no | `published` (default) or `unpublished` |

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;
use threeyd::FileSource;
use threeyd_core::{CatalogStatus, Field, PartnerId, ProductId, TechnologyId, Unit};

use super::{CatalogDetails, ItemData, MapperError};

/// Errors reading a CSV file.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("Failed to read CSV file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read CSV headers: {0}")]
    Csv(#[from] csv::Error),
}

/// One CSV row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRecord {
    /// Line number in the file, for log messages.
    pub line: u64,
    fields: HashMap<String, String>,
}

impl CsvRecord {
    /// The trimmed cell for `column`, or `None` when missing or empty.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CsvRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            line: 0,
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse CSV text with a header row. Malformed rows are logged and skipped.
///
/// # Errors
///
/// Returns `CsvError::Csv` if the header row cannot be read.
pub fn read_records(text: &str) -> Result<Vec<CsvRecord>, CsvError> {
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    tracing::debug!("CSV headers: {:?}", headers.iter().collect::<Vec<_>>());

    let mut records = Vec::new();
    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping malformed CSV record: {e}");
                continue;
            }
        };

        let mut record: CsvRecord = headers
            .iter()
            .map(str::trim)
            .zip(row.iter())
            .collect();
        record.line = row.position().map_or(0, csv::Position::line);
        records.push(record);
    }

    Ok(records)
}

/// Read and parse a CSV file.
///
/// # Errors
///
/// Returns `CsvError` if the file cannot be read or has no header row.
pub async fn read_records_from_path(path: &Path) -> Result<Vec<CsvRecord>, CsvError> {
    let text = tokio::fs::read_to_string(path).await?;
    let records = read_records(&text)?;
    tracing::info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Maps CSV rows to import items.
#[derive(Debug, Clone)]
pub struct CsvMapper {
    data_dir: PathBuf,
}

impl CsvMapper {
    /// Relative file paths are resolved against `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `MapperError` for a missing required column or a value that
    /// does not parse.
    pub fn map(&self, record: &CsvRecord) -> Result<ItemData, MapperError> {
        let stl_file = required(record, "stl_file")?;
        let cad_file = self.file(stl_file)?;
        let product_id = parse(record, "productId")?
            .map(ProductId::new)
            .ok_or(MapperError::MissingColumn("productId"))?;

        let quantity = parse::<u32>(record, "quantity")?.unwrap_or(1);
        if quantity == 0 {
            return Err(MapperError::InvalidValue {
                column: "quantity",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let unit = parse::<Unit>(record, "unit")?.unwrap_or_default();

        let preferred_due_date = match record.get("preferredDueDate") {
            Some(value) => Field::Value(NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(
                |e| MapperError::InvalidValue {
                    column: "preferredDueDate",
                    value: value.to_string(),
                    reason: e.to_string(),
                },
            )?),
            None => Field::Unset,
        };

        let attachments = record
            .get("attachments")
            .map(|value| {
                value
                    .split_whitespace()
                    .map(|file| self.file(file))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        let key = record.get("reference").unwrap_or(stl_file).to_string();

        Ok(ItemData {
            key,
            cad_file,
            unit,
            product_id,
            quantity,
            post_processings: Vec::new(),
            preferred_due_date,
            part_requirements: None,
            catalog: catalog_details(record)?,
            attachments,
        })
    }

    fn file(&self, value: &str) -> Result<FileSource, MapperError> {
        let source = FileSource::parse(value).map_err(|source| MapperError::File {
            value: value.to_string(),
            source,
        })?;

        Ok(match source {
            FileSource::Path(path) if path.is_relative() => {
                FileSource::Path(self.data_dir.join(path))
            }
            other => other,
        })
    }
}

fn catalog_details(record: &CsvRecord) -> Result<Option<CatalogDetails>, MapperError> {
    let Some(title) = record.get("title") else {
        return Ok(None);
    };

    let technology_id = parse(record, "technologyId")?
        .map(TechnologyId::new)
        .ok_or(MapperError::MissingColumn("technologyId"))?;
    let text = |column: &str| record.get(column).map(str::to_string);

    Ok(Some(CatalogDetails {
        title: title.to_string(),
        technology_id,
        partner_id: parse(record, "partnerId")?.map(PartnerId::new),
        reference: text("reference"),
        short_description: text("shortDescription"),
        detailed_description: text("detailedDescription"),
        status: parse::<CatalogStatus>(record, "status")?.unwrap_or_default(),
        post_processing_product_ids: Vec::new(),
    }))
}

fn required<'a>(record: &'a CsvRecord, column: &'static str) -> Result<&'a str, MapperError> {
    record.get(column).ok_or(MapperError::MissingColumn(column))
}

fn parse<T>(record: &CsvRecord, column: &'static str) -> Result<Option<T>, MapperError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    record
        .get(column)
        .map(|value| {
            value.parse().map_err(|e: T::Err| MapperError::InvalidValue {
                column,
                value: value.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mapper() -> CsvMapper {
        CsvMapper::new("/data")
    }

    #[test]
    fn test_read_records_by_header() {
        let text = "\u{FEFF}stl_file,productId,quantity\nparts/a.stl,3,\nb.stl,4,2\n";
        let records = read_records(text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("stl_file"), Some("parts/a.stl"));
        assert_eq!(records[0].get("quantity"), None);
        assert_eq!(records[1].get("quantity"), Some("2"));
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_minimal_row() {
        let record: CsvRecord = [("stl_file", "parts/a.stl"), ("productId", "3")]
            .into_iter()
            .collect();
        let item = mapper().map(&record).unwrap();

        assert_eq!(item.key, "parts/a.stl");
        assert_eq!(item.cad_file, FileSource::Path(PathBuf::from("/data/parts/a.stl")));
        assert_eq!(item.product_id, ProductId::new(3));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit, Unit::Mm);
        assert_eq!(item.preferred_due_date, Field::Unset);
        assert!(item.catalog.is_none());
        assert!(item.attachments.is_empty());
    }

    #[test]
    fn test_urls_and_absolute_paths_are_kept() {
        let record: CsvRecord = [
            ("stl_file", "https://files.example.com/a.stl"),
            ("productId", "3"),
            ("attachments", "/abs/drawing.pdf  sheet.pdf"),
        ]
        .into_iter()
        .collect();
        let item = mapper().map(&record).unwrap();

        assert!(matches!(item.cad_file, FileSource::Url(_)));
        assert_eq!(
            item.attachments,
            vec![
                FileSource::Path(PathBuf::from("/abs/drawing.pdf")),
                FileSource::Path(PathBuf::from("/data/sheet.pdf")),
            ]
        );
    }

    #[test]
    fn test_catalog_columns() {
        let record: CsvRecord = [
            ("stl_file", "a.stl"),
            ("productId", "3"),
            ("unit", "inch"),
            ("preferredDueDate", "2026-11-02"),
            ("title", "Bracket"),
            ("technologyId", "4"),
            ("reference", "BR-1"),
            ("status", "unpublished"),
        ]
        .into_iter()
        .collect();
        let item = mapper().map(&record).unwrap();

        assert_eq!(item.key, "BR-1");
        assert_eq!(item.unit, Unit::Inch);
        assert_eq!(
            item.preferred_due_date,
            Field::Value(NaiveDate::from_ymd_opt(2026, 11, 2).unwrap())
        );
        let catalog = item.catalog.unwrap();
        assert_eq!(catalog.title, "Bracket");
        assert_eq!(catalog.technology_id, TechnologyId::new(4));
        assert_eq!(catalog.partner_id, None);
        assert_eq!(catalog.status, CatalogStatus::Unpublished);
    }

    #[test]
    fn test_missing_and_invalid_columns() {
        let no_product: CsvRecord = [("stl_file", "a.stl")].into_iter().collect();
        assert!(matches!(
            mapper().map(&no_product),
            Err(MapperError::MissingColumn("productId"))
        ));

        let no_file: CsvRecord = [("stl_file", " "), ("productId", "3")].into_iter().collect();
        assert!(matches!(
            mapper().map(&no_file),
            Err(MapperError::MissingColumn("stl_file"))
        ));

        let bad_quantity: CsvRecord =
            [("stl_file", "a.stl"), ("productId", "3"), ("quantity", "two")]
                .into_iter()
                .collect();
        assert!(matches!(
            mapper().map(&bad_quantity),
            Err(MapperError::InvalidValue { column: "quantity", .. })
        ));

        let title_only: CsvRecord =
            [("stl_file", "a.stl"), ("productId", "3"), ("title", "Bracket")]
                .into_iter()
                .collect();
        assert!(matches!(
            mapper().map(&title_only),
            Err(MapperError::MissingColumn("technologyId"))
        ));
    }
}
