//! Catalog items and their attachments.

use reqwest::Method;
use serde_json::{Value, json};
use threeyd_core::{CatalogItem, CatalogItemId, LineId, NewCatalogItem};
use tracing::instrument;

use super::UserPanel;
use crate::ApiError;
use crate::gateway::RequestOptions;
use crate::transport::{RequestBody, Transport};
use crate::upload::FileSource;

impl<T: Transport> UserPanel<'_, T> {
    /// Turn an analysed basket line into a catalog item.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the line cannot be cataloged.
    #[instrument(skip(self), fields(line_id = %line_id))]
    pub async fn create_catalog_item_from_basket_line(
        &self,
        line_id: LineId,
    ) -> Result<CatalogItem, ApiError> {
        self.gateway()
            .request_as(
                Method::POST,
                "user-panel/catalog/",
                RequestOptions::json(json!({ "lineId": line_id })),
            )
            .await
    }

    /// Create a catalog item from an uploaded file and explicit details.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the details are rejected.
    #[instrument(skip(self, item), fields(title = %item.title, stl_file_uuid = %item.stl_file_uuid))]
    pub async fn create_catalog_item(&self, item: &NewCatalogItem) -> Result<CatalogItem, ApiError> {
        self.gateway()
            .request_as(
                Method::POST,
                "user-panel/catalog/",
                RequestOptions::json(serde_json::to_value(item)?),
            )
            .await
    }

    /// Attach a file (drawing, datasheet, ...) to a catalog item.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::CadFileNotFound` if the file cannot be read or
    /// downloaded, or an API error if the upload is rejected.
    #[instrument(skip(self, attachment), fields(catalog_item_id = %catalog_item_id, file = %attachment.location()))]
    pub async fn upload_catalog_item_attachment(
        &self,
        catalog_item_id: CatalogItemId,
        attachment: &FileSource,
    ) -> Result<Value, ApiError> {
        let gateway = self.gateway();
        let file = attachment.resolve(gateway.transport()).await?;

        gateway
            .request(
                Method::POST,
                &format!("user-panel/catalog/{catalog_item_id}/attachments/"),
                RequestOptions {
                    query: Vec::new(),
                    body: RequestBody::Multipart {
                        fields: Vec::new(),
                        file: file.into_part("file"),
                    },
                },
            )
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::AnalysisPolicy;
    use crate::testing::{ScriptedTransport, json_body, scripted_client};

    #[tokio::test]
    async fn test_catalog_item_from_line() {
        let transport = ScriptedTransport::new();
        transport.on_json("POST", "user-panel/catalog/", 201, &json!({"id": 55}));
        let client = scripted_client(&transport, AnalysisPolicy::default());

        let item = client
            .user_panel()
            .create_catalog_item_from_basket_line(LineId::new(2))
            .await
            .unwrap();

        assert_eq!(item.id, CatalogItemId::new(55));
        assert_eq!(
            json_body(&transport.requests()[0]).unwrap(),
            &json!({"lineId": 2})
        );
    }

    #[tokio::test]
    async fn test_attachment_upload_is_multipart() {
        let transport = ScriptedTransport::new();
        transport.on_json(
            "POST",
            "user-panel/catalog/55/attachments/",
            201,
            &json!({"id": 1}),
        );
        let client = scripted_client(&transport, AnalysisPolicy::default());

        client
            .user_panel()
            .upload_catalog_item_attachment(
                CatalogItemId::new(55),
                &FileSource::Bytes {
                    file_name: "drawing.pdf".to_string(),
                    data: b"%PDF".to_vec(),
                },
            )
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert!(matches!(
            &request.body,
            RequestBody::Multipart { fields, file } if fields.is_empty() && file.file_name == "drawing.pdf"
        ));
    }
}
