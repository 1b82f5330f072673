//! Baskets, basket lines, uploads and catalog items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{
    AnalysisStatus, BasketId, CatalogItemId, CatalogStatus, ColorId, Field, FormFieldId, FormId,
    LineId, PartnerId, PostProcessingId, ProductId, TechnologyId,
};

/// A server-side basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basket {
    pub id: BasketId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One line of a basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketLine {
    pub id: LineId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Returned by the upload endpoint; the uuid identifies the analysis job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadHandle {
    pub uuid: Uuid,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of the file status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    /// Missing when the platform does not know the file.
    #[serde(default)]
    pub status: Option<AnalysisStatus>,
}

/// A post-processing selection for a basket line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostProcessingConfig {
    pub post_processing_id: PostProcessingId,
    #[serde(default, skip_serializing_if = "Field::is_unset")]
    pub color_id: Field<ColorId>,
}

/// A partial basket line update. `Unset` fields keep their stored value and
/// an empty post-processing list is not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasketLineUpdate {
    pub quantity: Field<u32>,
    pub product_id: Field<ProductId>,
    pub post_processings: Vec<PostProcessingConfig>,
    pub preferred_due_date: Field<NaiveDate>,
}

/// One answered field of a part requirements form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub form_field_id: FormFieldId,
    /// String, bool, number, list of ids or strings, or `null`.
    pub value: Value,
}

/// Part requirements attached to a basket line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub form_id: FormId,
    pub fields: Vec<FormField>,
}

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input for creating a catalog item from an analysed file.
///
/// `None` values are sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogItem {
    pub detailed_description: Option<String>,
    pub partner_id: Option<PartnerId>,
    pub post_processing_product_ids: Vec<ProductId>,
    pub product_id: ProductId,
    pub reference: Option<String>,
    pub short_description: Option<String>,
    pub status: CatalogStatus,
    pub stl_file_uuid: Uuid,
    pub technology_id: TechnologyId,
    pub title: String,
}
