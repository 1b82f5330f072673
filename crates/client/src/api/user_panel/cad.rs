//! CAD file upload and analysis polling.
//!
//! After an upload the platform analyses the file asynchronously. Callers
//! poll `files/status/<uuid>/` until it reports `finished`; a basket line
//! cannot be priced or updated with a product before that.

use chrono::NaiveDate;
use reqwest::Method;
use threeyd_core::{
    AnalysisStatus, BasketId, BasketLine, BasketLineUpdate, Field, FileStatus, LineId, ProductId,
    Unit, UploadHandle,
};
use tracing::instrument;
use uuid::Uuid;

use super::UserPanel;
use crate::ApiError;
use crate::gateway::RequestOptions;
use crate::transport::{RequestBody, Transport};
use crate::upload::FileSource;

/// Absolute path of the upload endpoint (outside the API prefix).
const UPLOAD_PATH: &str = "/upload/";

impl<T: Transport> UserPanel<'_, T> {
    /// Upload a CAD file into a basket line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::CadFileNotFound` if the file cannot be read or
    /// downloaded, or an API error if the upload is rejected.
    #[instrument(skip(self, cad_file), fields(basket_id = %basket_id, line_id = %line_id, file = %cad_file.location()))]
    pub async fn upload_cad_file_to_basket(
        &self,
        basket_id: BasketId,
        line_id: LineId,
        unit: Unit,
        cad_file: &FileSource,
    ) -> Result<UploadHandle, ApiError> {
        let fields = vec![
            ("basket_id".to_string(), basket_id.to_string()),
            ("unit".to_string(), unit.to_string()),
            ("line_id".to_string(), line_id.to_string()),
        ];
        self.upload(fields, cad_file).await
    }

    /// Upload a CAD file without attaching it to a basket.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::CadFileNotFound` if the file cannot be read or
    /// downloaded, or an API error if the upload is rejected.
    #[instrument(skip(self, cad_file), fields(file = %cad_file.location()))]
    pub async fn upload_cad_file(
        &self,
        unit: Unit,
        cad_file: &FileSource,
    ) -> Result<UploadHandle, ApiError> {
        self.upload(vec![("unit".to_string(), unit.to_string())], cad_file)
            .await
    }

    async fn upload(
        &self,
        fields: Vec<(String, String)>,
        cad_file: &FileSource,
    ) -> Result<UploadHandle, ApiError> {
        let gateway = self.gateway();
        let file = cad_file.resolve(gateway.transport()).await?;

        gateway
            .request_as(
                Method::POST,
                UPLOAD_PATH,
                RequestOptions {
                    query: Vec::new(),
                    body: RequestBody::Multipart {
                        fields,
                        file: file.into_part("file"),
                    },
                },
            )
            .await
    }

    /// Poll the analysis status of an uploaded file until it is finished.
    ///
    /// Makes at most `max_attempts` status requests, sleeping `delay` after
    /// each `analysing` answer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::FileAnalysis` as soon as the platform reports a
    /// status other than `analysing` or `finished`, or once every attempt
    /// came back `analysing`. Request failures are returned as they are.
    #[instrument(skip(self), fields(uuid = %file_uuid))]
    pub async fn wait_for_analysis(&self, file_uuid: Uuid) -> Result<(), ApiError> {
        let policy = self.client.analysis_policy();
        let path = format!("files/status/{file_uuid}/");

        for attempt in 1..=policy.max_attempts {
            tracing::debug!("Checking file status {attempt}/{}", policy.max_attempts);

            let response: FileStatus = self
                .gateway()
                .request_as(Method::GET, &path, RequestOptions::none())
                .await?;

            match response.status {
                Some(AnalysisStatus::Finished) => {
                    tracing::debug!("File analysis done");
                    return Ok(());
                }
                Some(AnalysisStatus::Analysing) => tokio::time::sleep(policy.delay).await,
                other => {
                    return Err(ApiError::FileAnalysis {
                        uuid: file_uuid,
                        status: other.unwrap_or_else(|| AnalysisStatus::Other(String::new())),
                        attempts: attempt,
                    });
                }
            }
        }

        Err(ApiError::FileAnalysis {
            uuid: file_uuid,
            status: AnalysisStatus::Analysing,
            attempts: policy.max_attempts,
        })
    }

    /// Upload a file into a line, wait for its analysis and return the
    /// updated line.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error.
    pub async fn upload_and_wait(
        &self,
        cad_file: &FileSource,
        unit: Unit,
        basket_id: BasketId,
        line_id: LineId,
    ) -> Result<BasketLine, ApiError> {
        let upload = self
            .upload_cad_file_to_basket(basket_id, line_id, unit, cad_file)
            .await?;
        self.wait_for_analysis(upload.uuid).await?;
        self.get_basket_line(basket_id, line_id).await
    }

    /// Create a line, upload a file into it in the user's preferred unit,
    /// wait for the analysis and set product and quantity.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadArgument` if the preferences carry no usable
    /// unit, otherwise the first failing step's error.
    #[instrument(skip(self, cad_file), fields(basket_id = %basket_id, product_id = %product_id))]
    pub async fn create_line_with_cad_file_and_product(
        &self,
        basket_id: BasketId,
        cad_file: &FileSource,
        product_id: ProductId,
        quantity: u32,
        preferred_due_date: Field<NaiveDate>,
    ) -> Result<BasketLine, ApiError> {
        let preferences = self.client.my_profile().get_preferences().await?;
        let unit: Unit = preferences
            .unit
            .as_deref()
            .ok_or_else(|| ApiError::BadArgument("preferences carry no unit".to_string()))?
            .parse()
            .map_err(|e: threeyd_core::UnknownUnit| ApiError::BadArgument(e.to_string()))?;

        let line = self.create_basket_line(basket_id).await?;
        let upload = self
            .upload_cad_file_to_basket(basket_id, line.id, unit, cad_file)
            .await?;
        self.wait_for_analysis(upload.uuid).await?;

        self.update_basket_line(
            basket_id,
            line.id,
            BasketLineUpdate {
                quantity: Field::Value(quantity),
                product_id: Field::Value(product_id),
                preferred_due_date,
                ..BasketLineUpdate::default()
            },
        )
        .await
    }
}
