//! Baskets, basket lines, CAD uploads, quotes, orders and the catalog.
//!
//! The namespace is split by area:
//! - this module - baskets, lines, part requirements, material offers
//! - [`cad`] - file upload and analysis polling
//! - `orders` - requests for quote, quotes, orders, payment and shipping
//! - `catalog` - catalog items and their attachments

use reqwest::Method;
use serde_json::Value;
use threeyd_core::{
    AddressId, Basket, BasketId, BasketLine, BasketLineUpdate, Field, FormData, LineId,
    MaterialId, Page, ShippingMethodId,
};
use tracing::instrument;

use crate::gateway::{Gateway, RequestOptions};
use crate::params::Params;
use crate::transport::Transport;
use crate::{ApiError, ThreeYourMindClient};

pub mod cad;
mod catalog;
mod orders;

pub use orders::{FinalizeQuote, PlaceOrder};

/// Optional inputs of a basket price calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceQuery {
    pub shipping_address_id: Field<AddressId>,
    pub billing_address_id: Field<AddressId>,
    pub shipping_method_id: Field<ShippingMethodId>,
    pub voucher_code: Field<String>,
}

/// The `user_panel` namespace.
#[derive(Debug)]
pub struct UserPanel<'a, T> {
    client: &'a ThreeYourMindClient<T>,
}

impl<'a, T: Transport> UserPanel<'a, T> {
    pub(crate) const fn new(client: &'a ThreeYourMindClient<T>) -> Self {
        Self { client }
    }

    fn gateway(&self) -> &'a Gateway<T> {
        self.client.gateway()
    }

    // =========================================================================
    // Baskets
    // =========================================================================

    /// One page of the current user's baskets.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_baskets(
        &self,
        page: Field<u32>,
        page_size: Field<u32>,
    ) -> Result<Page<Basket>, ApiError> {
        let query = Params::new()
            .optional("page", page)
            .optional("pageSize", page_size)
            .into_query()?;

        self.gateway()
            .request_as(Method::GET, "user-panel/baskets/", RequestOptions::query(query))
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError::ObjectNotFound` if the basket does not exist.
    #[instrument(skip(self), fields(basket_id = %basket_id))]
    pub async fn get_basket(&self, basket_id: BasketId) -> Result<Basket, ApiError> {
        self.gateway()
            .request_as(
                Method::GET,
                &format!("user-panel/baskets/{basket_id}/"),
                RequestOptions::none(),
            )
            .await
    }

    /// Price of a basket, optionally including shipping, billing and a voucher.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(basket_id = %basket_id))]
    pub async fn get_basket_price(
        &self,
        basket_id: BasketId,
        currency: &str,
        options: PriceQuery,
    ) -> Result<Value, ApiError> {
        let query = Params::new()
            .required("currency", currency)
            .optional("shippingAddressId", options.shipping_address_id)
            .optional("shippingMethodId", options.shipping_method_id)
            .optional("billingAddressId", options.billing_address_id)
            .optional("voucherCode", options.voucher_code)
            .into_query()?;

        self.gateway()
            .request(
                Method::GET,
                &format!("user-panel/baskets/{basket_id}/price/"),
                RequestOptions::query(query),
            )
            .await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn create_basket(&self) -> Result<Basket, ApiError> {
        self.gateway()
            .request_as(Method::POST, "user-panel/baskets/", RequestOptions::none())
            .await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(basket_id = %basket_id))]
    pub async fn delete_basket(&self, basket_id: BasketId) -> Result<(), ApiError> {
        self.gateway()
            .request(
                Method::DELETE,
                &format!("user-panel/baskets/{basket_id}/"),
                RequestOptions::none(),
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(basket_id = %basket_id))]
    pub async fn update_basket(
        &self,
        basket_id: BasketId,
        title: Field<String>,
    ) -> Result<Basket, ApiError> {
        let body = Params::new().optional("title", title).into_json()?;

        self.gateway()
            .request_as(
                Method::PATCH,
                &format!("user-panel/baskets/{basket_id}/"),
                RequestOptions::json(body),
            )
            .await
    }

    // =========================================================================
    // Basket lines
    // =========================================================================

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(basket_id = %basket_id))]
    pub async fn get_basket_lines(&self, basket_id: BasketId) -> Result<Vec<BasketLine>, ApiError> {
        self.gateway()
            .request_as(
                Method::GET,
                &format!("user-panel/baskets/{basket_id}/lines/"),
                RequestOptions::none(),
            )
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError::ObjectNotFound` if the line does not exist.
    #[instrument(skip(self), fields(basket_id = %basket_id, line_id = %line_id))]
    pub async fn get_basket_line(
        &self,
        basket_id: BasketId,
        line_id: LineId,
    ) -> Result<BasketLine, ApiError> {
        self.gateway()
            .request_as(
                Method::GET,
                &format!("user-panel/baskets/{basket_id}/lines/{line_id}/"),
                RequestOptions::none(),
            )
            .await
    }

    /// Create an empty line; a CAD file is uploaded into it afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(basket_id = %basket_id))]
    pub async fn create_basket_line(&self, basket_id: BasketId) -> Result<BasketLine, ApiError> {
        self.gateway()
            .request_as(
                Method::POST,
                &format!("user-panel/baskets/{basket_id}/lines/"),
                RequestOptions::none(),
            )
            .await
    }

    /// Partially update a line. The product is sent as the line's offer.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the platform rejects a value.
    #[instrument(skip(self, update), fields(basket_id = %basket_id, line_id = %line_id))]
    pub async fn update_basket_line(
        &self,
        basket_id: BasketId,
        line_id: LineId,
        update: BasketLineUpdate,
    ) -> Result<BasketLine, ApiError> {
        self.gateway()
            .request_as(
                Method::PATCH,
                &format!("user-panel/baskets/{basket_id}/lines/{line_id}/"),
                RequestOptions::json(line_update_body(update)?),
            )
            .await
    }

    /// Submit answers to a part requirements form for a line.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the form is rejected.
    #[instrument(skip(self, form_data), fields(line_id = %line_id, form_id = %form_data.form_id))]
    pub async fn add_part_requirements_to_basket_line(
        &self,
        line_id: LineId,
        form_data: &FormData,
    ) -> Result<Value, ApiError> {
        self.gateway()
            .request(
                Method::POST,
                &format!("user-panel/forms/basket-line/{line_id}/"),
                RequestOptions::json(serde_json::to_value(form_data)?),
            )
            .await
    }

    // =========================================================================
    // Materials and offers
    // =========================================================================

    /// Materials available for a line in the current user's country.
    ///
    /// # Errors
    ///
    /// Returns error if either the preferences or the materials request fails.
    #[instrument(skip(self), fields(basket_id = %basket_id, line_id = %line_id))]
    pub async fn get_materials(
        &self,
        basket_id: BasketId,
        line_id: LineId,
    ) -> Result<Vec<Value>, ApiError> {
        let query = self.country_query().await?;
        self.gateway()
            .request_as(
                Method::GET,
                &format!("user-panel/baskets/{basket_id}/lines/{line_id}/materials/"),
                RequestOptions::query(query),
            )
            .await
    }

    /// Products (offers) of a material for a line in the current user's
    /// country.
    ///
    /// # Errors
    ///
    /// Returns error if either the preferences or the offers request fails.
    #[instrument(skip(self), fields(basket_id = %basket_id, line_id = %line_id, material_id = %material_id))]
    pub async fn get_products(
        &self,
        basket_id: BasketId,
        line_id: LineId,
        material_id: MaterialId,
    ) -> Result<Vec<Value>, ApiError> {
        let query = self.country_query().await?;
        self.gateway()
            .request_as(
                Method::GET,
                &format!(
                    "user-panel/baskets/{basket_id}/lines/{line_id}/materials/{material_id}/offers/"
                ),
                RequestOptions::query(query),
            )
            .await
    }

    async fn country_query(&self) -> Result<Vec<(String, String)>, ApiError> {
        let preferences = self.client.my_profile().get_preferences().await?;
        Ok(Params::new()
            .optional("country", Field::from_option(preferences.country))
            .into_query()?)
    }
}

/// JSON body of a basket line update.
fn line_update_body(update: BasketLineUpdate) -> Result<Value, ApiError> {
    let post_processings = if update.post_processings.is_empty() {
        Field::Unset
    } else {
        Field::Value(update.post_processings)
    };

    Ok(Params::new()
        .optional("quantity", update.quantity)
        .optional("offerId", update.product_id)
        .optional("postProcessings", post_processings)
        .optional("preferredDueDate", update.preferred_due_date)
        .into_json()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use threeyd_core::{PostProcessingConfig, PostProcessingId, ProductId};

    use super::*;
    use crate::AnalysisPolicy;
    use crate::testing::{ScriptedTransport, json_body, scripted_client};

    #[test]
    fn test_line_update_body_omits_unset_fields() {
        let body = line_update_body(BasketLineUpdate {
            quantity: Field::Value(3),
            ..BasketLineUpdate::default()
        })
        .unwrap();
        assert_eq!(body, json!({"quantity": 3}));
    }

    #[test]
    fn test_line_update_body_full() {
        let body = line_update_body(BasketLineUpdate {
            quantity: Field::Value(2),
            product_id: Field::Value(ProductId::new(17)),
            post_processings: vec![PostProcessingConfig {
                post_processing_id: PostProcessingId::new(5),
                color_id: Field::Null,
            }],
            preferred_due_date: Field::Value(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "quantity": 2,
                "offerId": 17,
                "postProcessings": [{"postProcessingId": 5, "colorId": null}],
                "preferredDueDate": "2024-03-09"
            })
        );
    }

    #[test]
    fn test_line_update_body_clears_due_date() {
        let body = line_update_body(BasketLineUpdate {
            preferred_due_date: Field::Null,
            ..BasketLineUpdate::default()
        })
        .unwrap();
        assert_eq!(body, json!({"preferredDueDate": null}));
    }

    #[tokio::test]
    async fn test_update_basket_without_title_sends_empty_object() {
        let transport = ScriptedTransport::new();
        transport.on_json("PATCH", "user-panel/baskets/4/", 200, &json!({"id": 4}));
        let client = scripted_client(&transport, AnalysisPolicy::default());

        client
            .user_panel()
            .update_basket(BasketId::new(4), Field::Unset)
            .await
            .unwrap();

        assert_eq!(json_body(&transport.requests()[0]).unwrap(), &json!({}));
    }

    #[tokio::test]
    async fn test_delete_basket_accepts_empty_response() {
        let transport = ScriptedTransport::new();
        transport.on(
            "DELETE",
            "user-panel/baskets/4/",
            crate::testing::ScriptedResponse::empty(204),
        );
        let client = scripted_client(&transport, AnalysisPolicy::default());

        client
            .user_panel()
            .delete_basket(BasketId::new(4))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_materials_use_preferred_country() {
        let transport = ScriptedTransport::new();
        transport.on_json(
            "GET",
            "my-profile/preferences/",
            200,
            &json!({"country": "DE", "currency": "EUR", "language": "de", "unit": "mm"}),
        );
        transport.on_json(
            "GET",
            "user-panel/baskets/1/lines/2/materials/",
            200,
            &json!([{"id": 10}]),
        );
        let client = scripted_client(&transport, AnalysisPolicy::default());

        let materials = client
            .user_panel()
            .get_materials(BasketId::new(1), LineId::new(2))
            .await
            .unwrap();

        assert_eq!(materials.len(), 1);
        let request = &transport.requests()[1];
        assert_eq!(request.url.query(), Some("country=DE"));
    }

    #[tokio::test]
    async fn test_basket_price_query() {
        let transport = ScriptedTransport::new();
        transport.on_json("GET", "user-panel/baskets/1/price/", 200, &json!({}));
        let client = scripted_client(&transport, AnalysisPolicy::default());

        client
            .user_panel()
            .get_basket_price(
                BasketId::new(1),
                "EUR",
                PriceQuery {
                    voucher_code: Field::Value("SPRING".to_string()),
                    ..PriceQuery::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].url.query(),
            Some("currency=EUR&voucherCode=SPRING")
        );
    }
}
