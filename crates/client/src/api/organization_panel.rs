//! User administration of the current organization.

use reqwest::Method;
use serde_json::Value;
use threeyd_core::{
    Address, CreatedUser, Field, NewAddress, NewUser, OrganizationUser, Page, Preferences,
    PreferencesUpdate, UserId,
};
use tracing::instrument;

use super::my_profile::preferences_body;
use crate::gateway::RequestOptions;
use crate::params::Params;
use crate::transport::Transport;
use crate::{ApiError, ThreeYourMindClient};

/// Pagination and search for [`OrganizationPanel::get_users`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub page: Field<u32>,
    pub page_size: Field<u32>,
    pub search: Field<String>,
}

impl UserQuery {
    /// One page of the given size.
    #[must_use]
    pub fn paged(page: u32, page_size: u32) -> Self {
        Self {
            page: Field::Value(page),
            page_size: Field::Value(page_size),
            search: Field::Unset,
        }
    }
}

/// The `organization_panel` namespace.
#[derive(Debug)]
pub struct OrganizationPanel<'a, T> {
    client: &'a ThreeYourMindClient<T>,
}

impl<'a, T: Transport> OrganizationPanel<'a, T> {
    pub(crate) const fn new(client: &'a ThreeYourMindClient<T>) -> Self {
        Self { client }
    }

    /// One page of the organization's users.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the page cannot be parsed.
    #[instrument(skip(self))]
    pub async fn get_users(&self, query: UserQuery) -> Result<Page<OrganizationUser>, ApiError> {
        let query = Params::new()
            .optional("page", query.page)
            .optional("pageSize", query.page_size)
            .optional("search", query.search)
            .into_query()?;

        self.client
            .gateway()
            .request_as(
                Method::GET,
                "organization-panel/users/",
                RequestOptions::query(query),
            )
            .await
    }

    /// Regional preferences of a user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_preferences(&self, user_id: UserId) -> Result<Preferences, ApiError> {
        self.client
            .gateway()
            .request_as(
                Method::GET,
                &format!("organization-panel/users/{user_id}/preferences/"),
                RequestOptions::none(),
            )
            .await
    }

    /// Update a user's preferences. Only set fields are saved.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the platform rejects a value.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn update_user_preferences(
        &self,
        user_id: UserId,
        update: PreferencesUpdate,
    ) -> Result<Value, ApiError> {
        self.client
            .gateway()
            .request(
                Method::PUT,
                &format!("organization-panel/users/{user_id}/preferences/"),
                RequestOptions::json(preferences_body(update)?),
            )
            .await
    }

    /// All addresses of a user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_addresses(&self, user_id: UserId) -> Result<Vec<Address>, ApiError> {
        self.client
            .gateway()
            .request_as(
                Method::GET,
                &format!("organization-panel/users/{user_id}/addresses/"),
                RequestOptions::none(),
            )
            .await
    }

    /// Create a user. Only the new id is read from the response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` if the platform rejects the user, for
    /// example because the email address is taken.
    #[instrument(skip(self), fields(email = %user.email))]
    pub async fn create_user(&self, user: &NewUser) -> Result<CreatedUser, ApiError> {
        self.client
            .gateway()
            .request_as(
                Method::POST,
                "organization-panel/users/create/",
                RequestOptions::json(serde_json::to_value(user)?),
            )
            .await
    }

    /// Create an address for a user. A user's first address becomes their
    /// default address.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the platform rejects the address.
    #[instrument(skip(self, address), fields(user_id = %user_id))]
    pub async fn create_user_address(
        &self,
        user_id: UserId,
        address: NewAddress,
    ) -> Result<Value, ApiError> {
        let body = Params::new()
            .required("city", address.city)
            .required("country", address.country)
            .optional("companyName", address.company_name)
            .optional("department", address.department)
            .required("firstName", address.first_name)
            .required("lastName", address.last_name)
            .required("line1", address.line1)
            .optional("line2", address.line2)
            .required("phoneNumber", address.phone_number)
            .optional("state", address.state)
            .optional("title", address.title)
            .optional("vatId", address.vat_id)
            .required("zipCode", address.zip_code)
            .into_json()?;

        self.client
            .gateway()
            .request(
                Method::POST,
                &format!("organization-panel/users/{user_id}/addresses/"),
                RequestOptions::json(body),
            )
            .await
    }
}
