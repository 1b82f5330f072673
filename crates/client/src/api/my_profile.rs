//! Preferences, profile and addresses of the current user.

use reqwest::Method;
use serde_json::Value;
use threeyd_core::{Address, AddressId, Preferences, PreferencesUpdate};
use tracing::instrument;

use crate::gateway::RequestOptions;
use crate::params::Params;
use crate::transport::Transport;
use crate::{ApiError, ThreeYourMindClient};

/// The `my_profile` namespace.
#[derive(Debug)]
pub struct MyProfile<'a, T> {
    client: &'a ThreeYourMindClient<T>,
}

impl<'a, T: Transport> MyProfile<'a, T> {
    pub(crate) const fn new(client: &'a ThreeYourMindClient<T>) -> Self {
        Self { client }
    }

    /// Country, currency, language and unit of the current user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_preferences(&self) -> Result<Preferences, ApiError> {
        self.client
            .gateway()
            .request_as(Method::GET, "my-profile/preferences/", RequestOptions::none())
            .await
    }

    /// Update the current user's preferences. Only set fields are saved.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the platform rejects a value.
    #[instrument(skip(self))]
    pub async fn set_preferences(&self, update: PreferencesUpdate) -> Result<Value, ApiError> {
        self.client
            .gateway()
            .request(
                Method::PUT,
                "my-profile/preferences/",
                RequestOptions::json(preferences_body(update)?),
            )
            .await
    }

    /// Name, default address, access roles etc. of the current user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<Value, ApiError> {
        self.client
            .gateway()
            .request(Method::GET, "my-profile/profile/", RequestOptions::none())
            .await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_addresses(&self) -> Result<Vec<Address>, ApiError> {
        self.client
            .gateway()
            .request_as(Method::GET, "my-profile/addresses/", RequestOptions::none())
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError::ObjectNotFound` if the address does not belong to
    /// the current user.
    #[instrument(skip(self), fields(address_id = %address_id))]
    pub async fn get_address(&self, address_id: AddressId) -> Result<Address, ApiError> {
        self.client
            .gateway()
            .request_as(
                Method::GET,
                &format!("my-profile/addresses/{address_id}/"),
                RequestOptions::none(),
            )
            .await
    }
}

/// JSON body of a preferences update.
pub(super) fn preferences_body(update: PreferencesUpdate) -> Result<Value, ApiError> {
    Ok(Params::new()
        .optional("country", update.country)
        .optional("currency", update.currency)
        .optional("language", update.language)
        .optional("unit", update.unit)
        .into_json()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use threeyd_core::Field;

    use super::*;
    use crate::AnalysisPolicy;
    use crate::testing::{ScriptedTransport, json_body, scripted_client};

    #[tokio::test]
    async fn test_set_preferences_sends_only_set_fields() {
        let transport = ScriptedTransport::new();
        transport.on_json("PUT", "my-profile/preferences/", 200, &json!({}));
        let client = scripted_client(&transport, AnalysisPolicy::default());

        client
            .my_profile()
            .set_preferences(PreferencesUpdate {
                unit: Field::Value("inch".to_string()),
                country: Field::Null,
                ..PreferencesUpdate::default()
            })
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(
            json_body(request).unwrap(),
            &json!({"country": null, "unit": "inch"})
        );
    }

    #[tokio::test]
    async fn test_get_address_not_found() {
        let transport = ScriptedTransport::new();
        transport.on_json(
            "GET",
            "my-profile/addresses/9/",
            404,
            &json!({"detail": "Not found."}),
        );
        let client = scripted_client(&transport, AnalysisPolicy::default());

        let result = client.my_profile().get_address(AddressId::new(9)).await;

        assert!(matches!(result, Err(ApiError::ObjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_requests_carry_token_header() {
        use secrecy::ExposeSecret;

        let transport = ScriptedTransport::new();
        transport.on_json("GET", "my-profile/profile/", 200, &json!({"id": 1}));
        let client = scripted_client(&transport, AnalysisPolicy::default());

        client.my_profile().get_profile().await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(
            request.authorization.as_ref().unwrap().expose_secret(),
            "Token test-token"
        );
    }
}
