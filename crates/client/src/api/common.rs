//! Lists shared by every panel.

use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use crate::gateway::RequestOptions;
use crate::transport::Transport;
use crate::{ApiError, ThreeYourMindClient};

/// The `common` namespace.
#[derive(Debug)]
pub struct Common<'a, T> {
    client: &'a ThreeYourMindClient<T>,
}

impl<'a, T: Transport> Common<'a, T> {
    pub(crate) const fn new(client: &'a ThreeYourMindClient<T>) -> Self {
        Self { client }
    }

    async fn list<R: serde::de::DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.client
            .gateway()
            .request_as(Method::GET, path, RequestOptions::none())
            .await
    }

    /// Available colors.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_colors(&self) -> Result<Vec<Value>, ApiError> {
        self.list("colors/").await
    }

    /// Units of measure, currently `mm` and `inch`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_units(&self) -> Result<Vec<Value>, ApiError> {
        self.list("units/").await
    }

    /// Countries with codes and full names.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_countries(&self) -> Result<Vec<Value>, ApiError> {
        self.list("countries/").await
    }

    /// Currency codes available on the platform.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_currencies(&self) -> Result<Vec<String>, ApiError> {
        self.list("currencies/").await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_materials(&self) -> Result<Vec<Value>, ApiError> {
        self.list("materials/").await
    }

    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_tax_types(&self) -> Result<Vec<String>, ApiError> {
        self.list("tax-types/").await
    }
}
