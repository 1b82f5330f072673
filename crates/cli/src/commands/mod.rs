//! Entry points behind the `threeyd` subcommands.
//!
//! Each command loads its platform settings from the environment (and an
//! optional `.env` file), runs one orchestrator and writes its report.

use thiserror::Error;
use threeyd::{ApiError, ConfigError};

use crate::import::csv_mapper::CsvError;
use crate::migrate::MigrationError;
use crate::report::ReportError;

pub mod import_catalog;
pub mod migrate_users;

/// Errors that abort a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
