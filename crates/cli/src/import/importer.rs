use threeyd::{ApiError, ReqwestTransport, ThreeYourMindClient, Transport};
use threeyd_core::{BasketId, BasketLineUpdate, CatalogItem, Field, LineId, UploadHandle};
use tracing::instrument;

use super::scratch::ScratchBasket;
use super::{
    FailedAttachment, ImportError, ImportRecord, ImportReport, ImportStage, ItemData, MapperError,
    log_failure,
};
use crate::report::truncate_reason;

/// Imports CAD files as catalog items through a scratch basket.
#[derive(Debug)]
pub struct CatalogImporter<T: Transport = ReqwestTransport> {
    client: ThreeYourMindClient<T>,
    dry_run: bool,
}

impl<T: Transport> CatalogImporter<T> {
    /// With `dry_run` set, lines are created, uploaded and updated but no
    /// catalog items or attachments are created.
    #[must_use]
    pub const fn new(client: ThreeYourMindClient<T>, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// Map and import every record.
    ///
    /// Records the mapper rejects are logged and counted as skipped. Every
    /// other record gets one entry in the report, failed or not.
    ///
    /// # Errors
    ///
    /// Returns error only if the scratch basket cannot be created.
    pub async fn import_items<R, I, F>(&self, records: I, mapper: F) -> Result<ImportReport, ApiError>
    where
        I: IntoIterator<Item = R>,
        F: Fn(&R) -> Result<ItemData, MapperError>,
    {
        let basket = ScratchBasket::acquire(&self.client).await?;
        let mut report = ImportReport::default();

        for (index, record) in records.into_iter().enumerate() {
            let item = match mapper(&record) {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!("Record {index} skipped: {e}");
                    report.skipped += 1;
                    continue;
                }
            };
            report
                .records
                .push(self.import_item(basket.id(), index, item).await);
        }

        if let Err(e) = basket.release().await {
            tracing::warn!("Failed to delete scratch basket: {e}");
        }

        report.log_summary();
        Ok(report)
    }

    #[instrument(skip(self, item), fields(key = %item.key))]
    async fn import_item(&self, basket_id: BasketId, index: usize, item: ItemData) -> ImportRecord {
        let mut record = ImportRecord::new(index, item.key.clone());

        let (line_id, upload) = match self.prepare_line(basket_id, &item).await {
            Ok(prepared) => prepared,
            Err(e) => {
                log_failure(index, &e);
                record.fail(&e);
                return record;
            }
        };
        record.line_id = Some(line_id);

        if self.dry_run {
            tracing::info!("Record {index}: line {line_id} ready (dry run)");
            return record;
        }

        let catalog_item = match self
            .create_catalog_item(line_id, &item, &upload)
            .await
            .map_err(ImportError::at(ImportStage::CreateCatalogItem))
        {
            Ok(catalog_item) => catalog_item,
            Err(e) => {
                log_failure(index, &e);
                record.fail(&e);
                return record;
            }
        };
        record.catalog_item_id = Some(catalog_item.id);

        let panel = self.client.user_panel();
        for attachment in &item.attachments {
            if let Err(e) = panel
                .upload_catalog_item_attachment(catalog_item.id, attachment)
                .await
            {
                let error = e.to_string();
                tracing::warn!(
                    "Record {index}: attachment {} failed: {}",
                    attachment.location(),
                    truncate_reason(&error)
                );
                record.failed_attachments.push(FailedAttachment {
                    file: attachment.location(),
                    error,
                });
            }
        }

        tracing::info!("Record {index}: catalog item {} created", catalog_item.id);
        record
    }

    /// Create a line, upload and analyse the file, then configure the line.
    async fn prepare_line(
        &self,
        basket_id: BasketId,
        item: &ItemData,
    ) -> Result<(LineId, UploadHandle), ImportError> {
        let panel = self.client.user_panel();

        let line = panel
            .create_basket_line(basket_id)
            .await
            .map_err(ImportError::at(ImportStage::CreateLine))?;

        let upload = panel
            .upload_cad_file_to_basket(basket_id, line.id, item.unit, &item.cad_file)
            .await
            .map_err(ImportError::at(ImportStage::UploadFile))?;

        panel
            .wait_for_analysis(upload.uuid)
            .await
            .map_err(ImportError::at(ImportStage::FileAnalysis))?;

        panel
            .update_basket_line(
                basket_id,
                line.id,
                BasketLineUpdate {
                    quantity: Field::Value(item.quantity),
                    product_id: Field::Value(item.product_id),
                    post_processings: item.post_processings.clone(),
                    preferred_due_date: item.preferred_due_date,
                },
            )
            .await
            .map_err(ImportError::at(ImportStage::UpdateLine))?;

        if let Some(form) = &item.part_requirements {
            panel
                .add_part_requirements_to_basket_line(line.id, form)
                .await
                .map_err(ImportError::at(ImportStage::PartRequirements))?;
        }

        Ok((line.id, upload))
    }

    async fn create_catalog_item(
        &self,
        line_id: LineId,
        item: &ItemData,
        upload: &UploadHandle,
    ) -> Result<CatalogItem, ApiError> {
        let panel = self.client.user_panel();
        match &item.catalog {
            Some(details) => {
                panel
                    .create_catalog_item(&details.to_new_item(item.product_id, upload))
                    .await
            }
            None => panel.create_catalog_item_from_basket_line(line_id).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use threeyd::testing::{ScriptedResponse, ScriptedTransport, json_body, scripted_client};
    use threeyd::{AnalysisPolicy, FileSource};
    use threeyd_core::{CatalogItemId, CatalogStatus, ProductId, TechnologyId, Unit};

    use super::*;
    use crate::import::CatalogDetails;

    const UUID: &str = "6f1c2a3e-0000-4000-8000-000000000001";

    fn policy() -> AnalysisPolicy {
        AnalysisPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(10),
        }
    }

    fn item(key: &str) -> ItemData {
        ItemData {
            key: key.to_string(),
            cad_file: FileSource::Bytes {
                file_name: format!("{key}.stl"),
                data: b"solid part".to_vec(),
            },
            unit: Unit::Mm,
            product_id: ProductId::new(3),
            quantity: 2,
            post_processings: Vec::new(),
            preferred_due_date: Field::Unset,
            part_requirements: None,
            catalog: None,
            attachments: Vec::new(),
        }
    }

    /// Routes for a successful import of a single line (id 11) in basket 7.
    fn scripted_platform() -> ScriptedTransport {
        let transport = ScriptedTransport::new();
        transport
            .on_json("POST", "user-panel/baskets/", 201, &json!({"id": 7}))
            .on_json("POST", "user-panel/baskets/7/lines/", 201, &json!({"id": 11}))
            .on_json("POST", "upload/", 201, &json!({"uuid": UUID}))
            .on_json(
                "GET",
                &format!("files/status/{UUID}/"),
                200,
                &json!({"status": "finished"}),
            )
            .on_json("PATCH", "user-panel/baskets/7/lines/11/", 200, &json!({"id": 11}))
            .on_json("POST", "user-panel/catalog/", 201, &json!({"id": 55}))
            .on("DELETE", "user-panel/baskets/7/", ScriptedResponse::empty(204));
        transport
    }

    fn pass_through(record: &Option<ItemData>) -> Result<ItemData, MapperError> {
        record.clone().ok_or(MapperError::MissingColumn("stl_file"))
    }

    #[tokio::test]
    async fn test_mapper_failures_are_skipped() {
        let transport = scripted_platform();
        let importer = CatalogImporter::new(scripted_client(&transport, policy()), false);

        let report = importer
            .import_items(vec![Some(item("a")), None, Some(item("c"))], pass_through)
            .await
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].index, 0);
        assert_eq!(report.records[1].index, 2);
        assert!(report.records.iter().all(ImportRecord::is_success));
        assert_eq!(report.records[1].catalog_item_id, Some(CatalogItemId::new(55)));
        assert_eq!(transport.count("DELETE", "user-panel/baskets/7/"), 1);
    }

    #[tokio::test]
    async fn test_line_update_body() {
        let transport = scripted_platform();
        let importer = CatalogImporter::new(scripted_client(&transport, policy()), false);

        importer
            .import_items(vec![Some(item("a"))], pass_through)
            .await
            .unwrap();

        let patch = &transport.requests_to("PATCH", "user-panel/baskets/7/lines/11/")[0];
        assert_eq!(
            json_body(patch).unwrap(),
            &json!({"quantity": 2, "offerId": 3})
        );
        assert_eq!(
            json_body(&transport.requests_to("POST", "user-panel/catalog/")[0]).unwrap(),
            &json!({"lineId": 11})
        );
    }

    #[tokio::test]
    async fn test_analysis_failure_is_recorded_and_run_continues() {
        let status_path = format!("files/status/{UUID}/");
        let transport = ScriptedTransport::new();
        transport
            .on_json("POST", "user-panel/baskets/", 201, &json!({"id": 7}))
            .on_json("POST", "user-panel/baskets/7/lines/", 201, &json!({"id": 11}))
            .on_json("POST", "upload/", 201, &json!({"uuid": UUID}))
            .on_json("GET", &status_path, 200, &json!({"status": "finished"}))
            .on_json("GET", &status_path, 200, &json!({"status": "failed"}))
            .on_json("GET", &status_path, 200, &json!({"status": "finished"}))
            .on_json("PATCH", "user-panel/baskets/7/lines/11/", 200, &json!({"id": 11}))
            .on_json("POST", "user-panel/catalog/", 201, &json!({"id": 55}))
            .on("DELETE", "user-panel/baskets/7/", ScriptedResponse::empty(204));
        let importer = CatalogImporter::new(scripted_client(&transport, policy()), false);

        let report = importer
            .import_items(
                vec![Some(item("a")), Some(item("b")), Some(item("c"))],
                pass_through,
            )
            .await
            .unwrap();

        assert_eq!(report.records.len(), 3);
        assert!(report.records[0].is_success());
        assert_eq!(report.records[1].error, Some(ImportStage::FileAnalysis));
        assert!(
            report.records[1]
                .error_reason
                .as_deref()
                .unwrap()
                .contains("failed")
        );
        assert_eq!(report.records[1].catalog_item_id, None);
        assert!(report.records[2].is_success());
        assert_eq!(transport.count("POST", "user-panel/catalog/"), 2);
        assert_eq!(transport.count("DELETE", "user-panel/baskets/7/"), 1);
    }

    #[tokio::test]
    async fn test_dry_run_creates_no_catalog_items() {
        let transport = scripted_platform();
        let importer = CatalogImporter::new(scripted_client(&transport, policy()), true);

        let mut with_attachment = item("a");
        with_attachment.attachments.push(FileSource::Bytes {
            file_name: "drawing.pdf".to_string(),
            data: b"%PDF".to_vec(),
        });
        let report = importer
            .import_items(vec![Some(with_attachment)], pass_through)
            .await
            .unwrap();

        assert!(report.records[0].is_success());
        assert_eq!(report.records[0].line_id, Some(LineId::new(11)));
        assert_eq!(report.records[0].catalog_item_id, None);
        assert_eq!(transport.count("PATCH", "user-panel/baskets/7/lines/11/"), 1);
        assert_eq!(transport.count("POST", "user-panel/catalog/"), 0);
        assert_eq!(transport.count("POST", "user-panel/catalog/55/attachments/"), 0);
    }

    #[tokio::test]
    async fn test_attachment_failure_keeps_item() {
        let transport = scripted_platform();
        transport.on(
            "POST",
            "user-panel/catalog/55/attachments/",
            ScriptedResponse::text(500, "storage down"),
        );
        let importer = CatalogImporter::new(scripted_client(&transport, policy()), false);

        let mut with_attachment = item("a");
        with_attachment.attachments.push(FileSource::Bytes {
            file_name: "drawing.pdf".to_string(),
            data: b"%PDF".to_vec(),
        });
        let report = importer
            .import_items(vec![Some(with_attachment)], pass_through)
            .await
            .unwrap();

        let record = &report.records[0];
        assert!(record.is_success());
        assert_eq!(record.catalog_item_id, Some(CatalogItemId::new(55)));
        assert_eq!(record.failed_attachments.len(), 1);
        assert_eq!(record.failed_attachments[0].file, "<memory:drawing.pdf>");
    }

    #[tokio::test]
    async fn test_catalog_details_use_upload_uuid() {
        let transport = scripted_platform();
        let importer = CatalogImporter::new(scripted_client(&transport, policy()), false);

        let mut detailed = item("a");
        detailed.catalog = Some(CatalogDetails {
            title: "Bracket".to_string(),
            technology_id: TechnologyId::new(4),
            partner_id: None,
            reference: Some("BR-1".to_string()),
            short_description: None,
            detailed_description: None,
            status: CatalogStatus::Published,
            post_processing_product_ids: Vec::new(),
        });
        importer
            .import_items(vec![Some(detailed)], pass_through)
            .await
            .unwrap();

        let body = json_body(&transport.requests_to("POST", "user-panel/catalog/")[0])
            .unwrap()
            .clone();
        assert_eq!(body["stlFileUuid"], UUID);
        assert_eq!(body["title"], "Bracket");
        assert_eq!(body["technologyId"], 4);
        assert_eq!(body["productId"], 3);
        assert_eq!(body["partnerId"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_basket_creation_failure_aborts() {
        let transport = ScriptedTransport::new();
        transport.on("POST", "user-panel/baskets/", ScriptedResponse::text(500, "down"));
        let importer = CatalogImporter::new(scripted_client(&transport, policy()), false);

        let result = importer
            .import_items(vec![Some(item("a"))], pass_through)
            .await;

        assert!(result.is_err());
        assert_eq!(transport.count("POST", "user-panel/baskets/7/lines/"), 0);
    }
}
