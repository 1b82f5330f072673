//! Request gateway: URL resolution, authentication and status mapping.
//!
//! Every namespace method goes through [`Gateway::request`]. Relative paths
//! are resolved under the `api/v2.0/` prefix; a path with a leading `/` is
//! taken relative to the platform root instead (the upload endpoint lives at
//! `/upload/`).

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::ApiError;
use crate::config::ClientConfig;
use crate::transport::{HttpRequest, RawResponse, RequestBody, Transport};

/// Version prefix of every relative API path.
pub const API_PREFIX: &str = "api/v2.0";

/// Optional parts of a request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RequestOptions {
    /// No query and no body.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Query string pairs only.
    #[must_use]
    pub fn query(query: Vec<(String, String)>) -> Self {
        Self {
            query,
            body: RequestBody::Empty,
        }
    }

    /// JSON body only.
    #[must_use]
    pub fn json(body: Value) -> Self {
        Self {
            query: Vec::new(),
            body: RequestBody::Json(body),
        }
    }
}

/// Sends authenticated requests to one platform.
#[derive(Debug)]
pub struct Gateway<T> {
    transport: T,
    base_url: Url,
    authorization: SecretString,
}

impl<T: Transport> Gateway<T> {
    /// Create a gateway for the configured platform.
    #[must_use]
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        let authorization =
            SecretString::from(format!("Token {}", config.access_token.expose_secret()));
        Self {
            transport,
            base_url: config.base_url.clone(),
            authorization,
        }
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve `path` against the platform URL and the API prefix.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadArgument` if the result is not a valid URL.
    pub fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        resolve_url(&self.base_url, path, query)
    }

    /// Execute a request and return the response payload.
    ///
    /// 2xx-4xx responses without a body yield `Value::String("")`.
    ///
    /// # Errors
    ///
    /// - `BadRequest` / `Unauthorized` / `ObjectNotFound` / `MethodNotAllowed`
    ///   for 400 / 401 / 404 / 405
    /// - `ServerError` for codes outside 200..500
    /// - `Http` if no response was received
    /// - `Decode` if a successful response is not JSON
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let url = self.url(path, &options.query)?;
        tracing::debug!("Request {method} to {url}");

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url,
                authorization: Some(self.authorization.clone()),
                body: options.body,
            })
            .await?;

        map_response(response)
    }

    /// Execute a request and deserialize the payload into `R`.
    ///
    /// # Errors
    ///
    /// Same as [`Gateway::request`], plus `Decode` if the payload does not
    /// match `R`.
    pub async fn request_as<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<R, ApiError> {
        let payload = self.request(method, path, options).await?;
        Ok(serde_json::from_value(payload)?)
    }
}

/// Build the absolute URL for `path`.
pub(crate) fn resolve_url(
    base_url: &Url,
    path: &str,
    query: &[(String, String)],
) -> Result<Url, ApiError> {
    let base = base_url.as_str().trim_end_matches('/');
    let joined = path.strip_prefix('/').map_or_else(
        || format!("{base}/{API_PREFIX}/{path}"),
        |absolute| format!("{base}/{absolute}"),
    );

    let mut url = Url::parse(&joined)
        .map_err(|e| ApiError::BadArgument(format!("invalid request URL '{joined}': {e}")))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Map a response status to a payload or an error.
///
/// Codes in 200..500 other than 400/401/404/405 are returned as success,
/// redirects included.
pub(crate) fn map_response(response: RawResponse) -> Result<Value, ApiError> {
    let RawResponse { status, body } = response;

    if !(200..500).contains(&status) {
        return Err(ApiError::ServerError {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    let payload = if body.is_empty() {
        Value::String(String::new())
    } else {
        match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            // Error pages are not always JSON; keep their text
            Err(_) if matches!(status, 400 | 401 | 404 | 405) => {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            }
            Err(e) => return Err(ApiError::Decode(e)),
        }
    };

    match status {
        400 => Err(ApiError::BadRequest(payload)),
        401 => Err(ApiError::Unauthorized(payload)),
        404 => Err(ApiError::ObjectNotFound(payload)),
        405 => Err(ApiError::MethodNotAllowed(payload)),
        _ => Ok(payload),
    }
}
