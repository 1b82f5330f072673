//! Catalog import.
//!
//! Every input record goes through the same sequence of API calls inside one
//! scratch basket:
//!
//! 1. map the record to [`ItemData`] (a [`MapperError`] skips the record)
//! 2. create a basket line, upload the CAD file, wait for the analysis
//! 3. set product, quantity, post-processings and part requirements
//! 4. create the catalog item and upload its attachments (not in dry runs)
//!
//! A failure in steps 2-4 is recorded against the record with the
//! [`ImportStage`] it happened in; the run continues with the next record.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use threeyd::{ApiError, FileSource};
use threeyd_core::{
    CatalogItemId, CatalogStatus, Field, FormData, LineId, NewCatalogItem, PartnerId,
    PostProcessingConfig, ProductId, TechnologyId, Unit, UploadHandle,
};

use crate::report::truncate_reason;

pub mod csv_mapper;
mod importer;
mod scratch;

pub use importer::CatalogImporter;
pub use scratch::ScratchBasket;

/// Everything needed to import one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemData {
    /// Identifies the record in logs and the report.
    pub key: String,
    pub cad_file: FileSource,
    pub unit: Unit,
    pub product_id: ProductId,
    pub quantity: u32,
    pub post_processings: Vec<PostProcessingConfig>,
    pub preferred_due_date: Field<NaiveDate>,
    pub part_requirements: Option<FormData>,
    /// Explicit catalog fields. Without them the catalog item is created
    /// from the basket line.
    pub catalog: Option<CatalogDetails>,
    pub attachments: Vec<FileSource>,
}

/// Catalog fields set by the mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDetails {
    pub title: String,
    pub technology_id: TechnologyId,
    pub partner_id: Option<PartnerId>,
    pub reference: Option<String>,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub status: CatalogStatus,
    pub post_processing_product_ids: Vec<ProductId>,
}

impl CatalogDetails {
    /// Catalog item input for the analysed upload.
    #[must_use]
    pub fn to_new_item(&self, product_id: ProductId, upload: &UploadHandle) -> NewCatalogItem {
        NewCatalogItem {
            detailed_description: self.detailed_description.clone(),
            partner_id: self.partner_id,
            post_processing_product_ids: self.post_processing_product_ids.clone(),
            product_id,
            reference: self.reference.clone(),
            short_description: self.short_description.clone(),
            status: self.status,
            stl_file_uuid: upload.uuid,
            technology_id: self.technology_id,
            title: self.title.clone(),
        }
    }
}

/// A record that cannot be turned into [`ItemData`].
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("invalid value '{value}' in column '{column}': {reason}")]
    InvalidValue {
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid file '{value}': {source}")]
    File {
        value: String,
        #[source]
        source: ApiError,
    },
}

/// The step of an import a record failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStage {
    CreateLine,
    UploadFile,
    FileAnalysis,
    UpdateLine,
    PartRequirements,
    CreateCatalogItem,
}

impl ImportStage {
    /// Every stage in execution order.
    pub const ALL: [Self; 6] = [
        Self::CreateLine,
        Self::UploadFile,
        Self::FileAnalysis,
        Self::UpdateLine,
        Self::PartRequirements,
        Self::CreateCatalogItem,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateLine => "create_line",
            Self::UploadFile => "upload_file",
            Self::FileAnalysis => "file_analysis",
            Self::UpdateLine => "update_line",
            Self::PartRequirements => "part_requirements",
            Self::CreateCatalogItem => "create_catalog_item",
        }
    }
}

impl std::fmt::Display for ImportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API failure tagged with the stage it happened in.
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct ImportError {
    pub stage: ImportStage,
    pub source: ApiError,
}

impl ImportError {
    /// Adapter for `map_err` that tags an error with `stage`.
    pub fn at(stage: ImportStage) -> impl FnOnce(ApiError) -> Self {
        move |source| Self { stage, source }
    }
}

/// An attachment that could not be uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAttachment {
    pub file: String,
    pub error: String,
}

/// Outcome of one mapped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    /// Position of the record in the input.
    pub index: usize,
    pub key: String,
    /// `null` on success.
    pub error: Option<ImportStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
    pub line_id: Option<LineId>,
    pub catalog_item_id: Option<CatalogItemId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_attachments: Vec<FailedAttachment>,
}

impl ImportRecord {
    fn new(index: usize, key: String) -> Self {
        Self {
            index,
            key,
            error: None,
            error_reason: None,
            line_id: None,
            catalog_item_id: None,
            failed_attachments: Vec::new(),
        }
    }

    fn fail(&mut self, error: &ImportError) {
        self.error = Some(error.stage);
        self.error_reason = Some(error.source.to_string());
    }

    /// `true` when the record reached the end of the import.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// One entry per record that passed the mapper, in input order.
    pub records: Vec<ImportRecord>,
    /// Records rejected by the mapper.
    pub skipped: usize,
}

impl ImportReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.is_success()).count()
    }

    #[must_use]
    pub fn failed_at(&self, stage: ImportStage) -> usize {
        self.records
            .iter()
            .filter(|r| r.error == Some(stage))
            .count()
    }

    /// Log totals and failures per stage.
    pub fn log_summary(&self) {
        let total = self.records.len();
        let succeeded = self.succeeded();
        tracing::info!("Import has run");
        tracing::info!("Total records: {}", total + self.skipped);
        tracing::info!("Skipped by mapper: {}", self.skipped);
        tracing::info!("Successful imports: {succeeded}");
        tracing::info!("Failed imports: {}", total - succeeded);

        for stage in ImportStage::ALL {
            let count = self.failed_at(stage);
            if count > 0 {
                tracing::info!("\tfailed at {stage}: {count}");
            }
        }

        let attachment_failures: usize =
            self.records.iter().map(|r| r.failed_attachments.len()).sum();
        if attachment_failures > 0 {
            tracing::info!("Failed attachments: {attachment_failures}");
        }
    }
}

fn log_failure(index: usize, error: &ImportError) {
    tracing::warn!(
        "Record {index}: {} failed: {}",
        error.stage,
        truncate_reason(&error.source.to_string())
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_stage_wire_names() {
        for stage in ImportStage::ALL {
            assert_eq!(serde_json::to_value(stage).unwrap(), json!(stage.as_str()));
        }
    }

    #[test]
    fn test_failed_record_serialization() {
        let mut record = ImportRecord::new(1, "bracket.stl".to_string());
        record.fail(&ImportError {
            stage: ImportStage::FileAnalysis,
            source: ApiError::BadArgument("boom".to_string()),
        });

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["error"], "file_analysis");
        assert_eq!(value["error_reason"], "Bad argument: boom");
        assert!(value.get("failed_attachments").is_none());
    }

    #[test]
    fn test_report_counts() {
        let mut failed = ImportRecord::new(0, "a".to_string());
        failed.error = Some(ImportStage::UploadFile);
        let report = ImportReport {
            records: vec![failed, ImportRecord::new(1, "b".to_string())],
            skipped: 1,
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed_at(ImportStage::UploadFile), 1);
        assert_eq!(report.failed_at(ImportStage::CreateLine), 0);
    }
}
