//! The HTTP seam between the gateway and the network.
//!
//! The gateway builds a complete [`HttpRequest`] (absolute URL, auth header,
//! body) and hands it to a [`Transport`]; status handling happens afterwards
//! on the returned [`RawResponse`]. [`ReqwestTransport`] is the production
//! implementation.

use std::future::Future;
use std::time::Duration;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::ApiError;

/// Request timeout for every call. There is no other deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A file carried in a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name (`file` for every upload endpoint).
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Request body variants the API uses.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// Text form fields plus one file.
    Multipart {
        fields: Vec<(String, String)>,
        file: FilePart,
    },
}

/// A fully resolved outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    /// Complete `Authorization` header value, if the request is authenticated.
    pub authorization: Option<SecretString>,
    pub body: RequestBody,
}

/// Status code and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Executes HTTP requests.
pub trait Transport: Send + Sync {
    /// Send the request and return whatever the server answered.
    ///
    /// Only failures to obtain a response are errors; any status code is a
    /// successful `RawResponse`.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<RawResponse, ApiError>> + Send;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, ApiError> {
        let mut builder = self.client.request(request.method, request.url);

        if let Some(authorization) = &request.authorization {
            builder = builder.header(
                reqwest::header::AUTHORIZATION,
                authorization.expose_secret(),
            );
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart { fields, file } => {
                let mut form = Form::new();
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                let part = Part::bytes(file.bytes).file_name(file.file_name);
                builder.multipart(form.part(file.field, part))
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}
