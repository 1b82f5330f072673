//! Catalog import command.
//!
//! # Usage
//!
//! ```bash
//! threeyd import-catalog --csv parts.csv --data-dir ./cad --report import.json
//! ```
//!
//! # Environment Variables
//!
//! - `THREEYD_BASE_URL` - platform URL, ex. `https://example.3yourmind.com`
//! - `THREEYD_ACCESS_TOKEN` - API token of the importing user
//! - `THREEYD_ANALYSIS_MAX_ATTEMPTS`, `THREEYD_ANALYSIS_DELAY_MS` - optional
//!   analysis polling settings

use std::path::{Path, PathBuf};

use threeyd::{ClientConfig, ThreeYourMindClient};

use super::CommandError;
use crate::import::CatalogImporter;
use crate::import::csv_mapper::{CsvMapper, read_records_from_path};
use crate::report;

/// Environment prefix of the platform settings.
pub const ENV_PREFIX: &str = "THREEYD";

/// Default report file.
pub const DEFAULT_REPORT: &str = "import.json";

/// Options of `threeyd import-catalog`.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub csv: PathBuf,
    /// Base of relative file paths; defaults to the CSV's directory.
    pub data_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub report: PathBuf,
}

/// Import every CSV row and write the report.
///
/// # Errors
///
/// Returns `CommandError` if the configuration or CSV cannot be loaded, the
/// scratch basket cannot be created, or the report cannot be written.
/// Failed rows are reported, not returned.
pub async fn run(options: &ImportOptions) -> Result<(), CommandError> {
    let config = ClientConfig::from_env(ENV_PREFIX)?;
    tracing::info!("Importing into {}", config.base_url);

    let records = read_records_from_path(&options.csv).await?;
    let mapper = CsvMapper::new(data_dir(options));

    let importer = CatalogImporter::new(ThreeYourMindClient::new(&config)?, options.dry_run);
    let import = importer
        .import_items(records, |record| {
            mapper.map(record).inspect_err(|_| {
                tracing::debug!("CSV line {} rejected", record.line);
            })
        })
        .await?;

    report::write_json(&options.report, &import).await?;
    Ok(())
}

fn data_dir(options: &ImportOptions) -> PathBuf {
    options.data_dir.clone().unwrap_or_else(|| {
        options
            .csv
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(csv: &str, data_dir: Option<&str>) -> ImportOptions {
        ImportOptions {
            csv: PathBuf::from(csv),
            data_dir: data_dir.map(PathBuf::from),
            dry_run: false,
            report: PathBuf::from(DEFAULT_REPORT),
        }
    }

    #[test]
    fn test_data_dir_defaults_to_csv_directory() {
        assert_eq!(
            data_dir(&options("/imports/parts.csv", None)),
            PathBuf::from("/imports")
        );
        assert_eq!(
            data_dir(&options("/imports/parts.csv", Some("/cad"))),
            PathBuf::from("/cad")
        );
    }
}
