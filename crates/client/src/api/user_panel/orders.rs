//! Requests for quote, quotes, orders, payment and shipping methods.

use reqwest::Method;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};
use threeyd_core::{
    AddressId, BasketId, Field, OrderId, OrderLineId, PartnerId, PaymentMethod, PaymentMethodId,
    PickupLocationId, Quote, QuoteId, ShippingMethod, ShippingMethodId,
};
use tracing::instrument;

use super::UserPanel;
use crate::ApiError;
use crate::gateway::RequestOptions;
use crate::params::Params;
use crate::transport::Transport;

/// Checkout details of a quote. `None` values are sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeQuote {
    pub billing_address_id: Option<AddressId>,
    pub shipping_address_id: Option<AddressId>,
    pub shipping_method_id: Option<ShippingMethodId>,
    pub pickup_location_id: Option<PickupLocationId>,
    pub delivery_instructions: Option<String>,
}

/// Payment details for ordering a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub payment_method_id: PaymentMethodId,
    pub authorized_amount: Decimal,
    pub reference: Option<String>,
    pub currency: Option<String>,
    pub voucher_code: String,
}

impl PlaceOrder {
    /// Payment with no reference, currency or voucher.
    #[must_use]
    pub const fn new(payment_method_id: PaymentMethodId, authorized_amount: Decimal) -> Self {
        Self {
            payment_method_id,
            authorized_amount,
            reference: None,
            currency: None,
            voucher_code: String::new(),
        }
    }
}

impl<T: Transport> UserPanel<'_, T> {
    /// Ask a supplier to quote a basket.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, message), fields(basket_id = %basket_id, supplier_id = %supplier_id))]
    pub async fn create_request_for_quote(
        &self,
        basket_id: BasketId,
        supplier_id: PartnerId,
        message: &str,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "basketId": basket_id,
            "partnerId": supplier_id,
            "message": message,
        });

        self.gateway()
            .request(
                Method::POST,
                "user-panel/requests-for-quote/",
                RequestOptions::json(body),
            )
            .await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_quotes(&self) -> Result<Value, ApiError> {
        self.gateway()
            .request(Method::GET, "user-panel/quotes/", RequestOptions::none())
            .await
    }

    /// # Errors
    ///
    /// Returns error if the request fails or the quote cannot be parsed.
    #[instrument(skip(self), fields(quote_id = %quote_id))]
    pub async fn get_quote(&self, quote_id: QuoteId) -> Result<Quote, ApiError> {
        self.gateway()
            .request_as(
                Method::GET,
                &format!("user-panel/quotes/{quote_id}/"),
                RequestOptions::none(),
            )
            .await
    }

    /// Set addresses and shipping of a quote so it can be ordered.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the details are rejected.
    #[instrument(skip(self), fields(quote_id = %quote_id))]
    pub async fn finalize_quote(
        &self,
        quote_id: QuoteId,
        details: FinalizeQuote,
    ) -> Result<Value, ApiError> {
        self.gateway()
            .request(
                Method::PUT,
                &format!("user-panel/quotes/{quote_id}/finalize/"),
                RequestOptions::json(serde_json::to_value(details)?),
            )
            .await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_orders(&self) -> Result<Value, ApiError> {
        self.gateway()
            .request(Method::GET, "user-panel/orders/", RequestOptions::none())
            .await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Value, ApiError> {
        self.gateway()
            .request(
                Method::GET,
                &format!("user-panel/orders/{order_id}/"),
                RequestOptions::none(),
            )
            .await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(order_id = %order_id, line_id = %line_id))]
    pub async fn get_order_line(
        &self,
        order_id: OrderId,
        line_id: OrderLineId,
    ) -> Result<Value, ApiError> {
        self.gateway()
            .request(
                Method::GET,
                &format!("user-panel/orders/{order_id}/{line_id}/"),
                RequestOptions::none(),
            )
            .await
    }

    /// Order a finalized quote.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the payment is rejected.
    #[instrument(skip(self, payment), fields(quote_id = %quote_id))]
    pub async fn place_order_from_quote(
        &self,
        quote_id: QuoteId,
        payment: PlaceOrder,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "additionalInformation": { "reference": payment.reference },
            "payment": {
                "currency": payment.currency,
                "details": {},
                "methodId": payment.payment_method_id,
                "authorizedAmount": payment.authorized_amount,
            },
            "quoteId": quote_id,
            "voucherCode": payment.voucher_code,
        });

        self.gateway()
            .request(Method::POST, "user-panel/orders/", RequestOptions::json(body))
            .await
    }

    /// Order a quote with the first available address, shipping and payment
    /// method. A quote that is not finalized yet is finalized first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadArgument` if the user has no address or the
    /// supplier offers no shipping or payment method, otherwise the first
    /// failing request's error.
    #[instrument(skip(self), fields(quote_id = %quote_id))]
    pub async fn quick_order_quote(&self, quote_id: QuoteId) -> Result<Value, ApiError> {
        let quote = self.get_quote(quote_id).await?;
        let supplier_id = quote.partner.id;

        if !quote.is_finalized() {
            let addresses = self.client.my_profile().get_addresses().await?;
            let address_id = addresses
                .first()
                .map(|address| address.id)
                .ok_or_else(|| ApiError::BadArgument("user has no address".to_string()))?;

            let shipping_methods = self
                .get_shipping_methods(supplier_id, Field::Value(quote_id), Field::Value(address_id))
                .await?;
            let shipping_method_id = shipping_methods
                .first()
                .map(|method| method.id)
                .ok_or_else(|| {
                    ApiError::BadArgument(format!("supplier {supplier_id} has no shipping method"))
                })?;

            self.finalize_quote(
                quote_id,
                FinalizeQuote {
                    billing_address_id: Some(address_id),
                    shipping_address_id: Some(address_id),
                    shipping_method_id: Some(shipping_method_id),
                    ..FinalizeQuote::default()
                },
            )
            .await?;
        }

        let payment_methods = self.get_payment_methods(supplier_id).await?;
        let payment_method_id = payment_methods
            .first()
            .map(|method| method.id)
            .ok_or_else(|| {
                ApiError::BadArgument(format!("supplier {supplier_id} has no payment method"))
            })?;

        self.place_order_from_quote(
            quote_id,
            PlaceOrder {
                currency: quote.currency,
                ..PlaceOrder::new(payment_method_id, quote.total_price.inclusive_tax)
            },
        )
        .await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(supplier_id = %supplier_id))]
    pub async fn get_payment_methods(
        &self,
        supplier_id: PartnerId,
    ) -> Result<Vec<PaymentMethod>, ApiError> {
        self.gateway()
            .request_as(
                Method::GET,
                &format!("user-panel/services/{supplier_id}/payment-methods/"),
                RequestOptions::none(),
            )
            .await
    }

    /// Shipping methods of a supplier, optionally for a quote and address.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(supplier_id = %supplier_id))]
    pub async fn get_shipping_methods(
        &self,
        supplier_id: PartnerId,
        quote_id: Field<QuoteId>,
        shipping_address_id: Field<AddressId>,
    ) -> Result<Vec<ShippingMethod>, ApiError> {
        let query = Params::new()
            .optional("quoteId", quote_id)
            .optional("shippingAddressId", shipping_address_id)
            .into_query()?;

        self.gateway()
            .request_as(
                Method::GET,
                &format!("user-panel/services/{supplier_id}/shipping-methods/"),
                RequestOptions::query(query),
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

    fn quote(status: &str) -> Value {
        json!({
            "id": 7,
            "status": status,
            "currency": "EUR",
            "partner": {"id": 3},
            "totalPrice": {"inclusiveTax": "119.00"}
        })
    }

    #[tokio::test]
    async fn test_finalize_sends_nulls_for_missing_details() {
        let transport = ScriptedTransport::new();
        transport.on_json("PUT", "user-panel/quotes/7/finalize/", 200, &json!({}));
        let client = scripted_client(&transport, AnalysisPolicy::default());

        client
            .user_panel()
            .finalize_quote(QuoteId::new(7), FinalizeQuote::default())
            .await
            .unwrap();

        assert_eq!(
            json_body(&transport.requests()[0]).unwrap(),
            &json!({
                "billingAddressId": null,
                "shippingAddressId": null,
                "shippingMethodId": null,
                "pickupLocationId": null,
                "deliveryInstructions": null
            })
        );
    }

    #[tokio::test]
    async fn test_quick_order_finalizes_open_quote() {
        let transport = ScriptedTransport::new();
        transport
            .on_json("GET", "user-panel/quotes/7/", 200, &quote("open"))
            .on_json("GET", "my-profile/addresses/", 200, &json!([{"id": 11}, {"id": 12}]))
            .on_json(
                "GET",
                "user-panel/services/3/shipping-methods/",
                200,
                &json!([{"id": 21}]),
            )
            .on_json("PUT", "user-panel/quotes/7/finalize/", 200, &json!({}))
            .on_json(
                "GET",
                "user-panel/services/3/payment-methods/",
                200,
                &json!([{"id": 31}]),
            )
            .on_json("POST", "user-panel/orders/", 201, &json!({"id": 99}));
        let client = scripted_client(&transport, AnalysisPolicy::default());

        let order = client
            .user_panel()
            .quick_order_quote(QuoteId::new(7))
            .await
            .unwrap();

        assert_eq!(order, json!({"id": 99}));

        let shipping = &transport.requests_to("GET", "user-panel/services/3/shipping-methods/")[0];
        assert_eq!(shipping.url.query(), Some("quoteId=7&shippingAddressId=11"));

        let finalize = &transport.requests_to("PUT", "user-panel/quotes/7/finalize/")[0];
        let finalize = json_body(finalize).unwrap();
        assert_eq!(finalize["billingAddressId"], 11);
        assert_eq!(finalize["shippingMethodId"], 21);

        let order_request = &transport.requests_to("POST", "user-panel/orders/")[0];
        let body = json_body(order_request).unwrap();
        assert_eq!(body["quoteId"], 7);
        assert_eq!(body["payment"]["methodId"], 31);
        assert_eq!(body["payment"]["currency"], "EUR");
        assert_eq!(body["payment"]["authorizedAmount"], "119.00");
        assert_eq!(body["voucherCode"], "");
    }

    #[tokio::test]
    async fn test_quick_order_skips_finalize_for_finalized_quote() {
        let transport = ScriptedTransport::new();
        transport
            .on_json("GET", "user-panel/quotes/7/", 200, &quote("finalized"))
            .on_json(
                "GET",
                "user-panel/services/3/payment-methods/",
                200,
                &json!([{"id": 31}]),
            )
            .on_json("POST", "user-panel/orders/", 201, &json!({"id": 99}));
        let client = scripted_client(&transport, AnalysisPolicy::default());

        client
            .user_panel()
            .quick_order_quote(QuoteId::new(7))
            .await
            .unwrap();

        assert_eq!(transport.count("PUT", "user-panel/quotes/7/finalize/"), 0);
        assert_eq!(transport.count("GET", "my-profile/addresses/"), 0);
    }

    #[tokio::test]
    async fn test_quick_order_without_payment_method() {
        let transport = ScriptedTransport::new();
        transport
            .on_json("GET", "user-panel/quotes/7/", 200, &quote("finalized"))
            .on_json("GET", "user-panel/services/3/payment-methods/", 200, &json!([]));
        let client = scripted_client(&transport, AnalysisPolicy::default());

        let result = client.user_panel().quick_order_quote(QuoteId::new(7)).await;

        assert!(matches!(result, Err(ApiError::BadArgument(_))));
        assert_eq!(transport.count("POST", "user-panel/orders/"), 0);
    }
}
