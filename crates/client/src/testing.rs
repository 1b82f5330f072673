//! In-memory [`Transport`] for tests.
//!
//! Responses are scripted per method and path. The path is matched without
//! the leading `/` and without the `api/v2.0/` prefix, so
//! `"user-panel/baskets/"` and `"upload/"` are both valid keys. Each route
//! holds a queue; the last queued response repeats. Unmatched requests get
//! an empty 404.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::SecretString;
use serde_json::Value;

use crate::config::{AnalysisPolicy, ClientConfig};
use crate::gateway::API_PREFIX;
use crate::transport::{HttpRequest, RawResponse, RequestBody, Transport};
use crate::{ApiError, ThreeYourMindClient};

/// Base URL of clients built by [`scripted_client`].
pub const TEST_BASE_URL: &str = "https://example.3yourmind.com";

/// A client for [`TEST_BASE_URL`] that sends through `transport`.
///
/// # Panics
///
/// Never; the test base URL is valid.
#[must_use]
pub fn scripted_client(
    transport: &ScriptedTransport,
    analysis: AnalysisPolicy,
) -> ThreeYourMindClient<ScriptedTransport> {
    let config = ClientConfig {
        base_url: url::Url::parse(TEST_BASE_URL).expect("test base URL is valid"),
        access_token: SecretString::from("test-token"),
        analysis,
    };
    ThreeYourMindClient::with_transport(&config, transport.clone())
}

/// The JSON body of a recorded request.
#[must_use]
pub fn json_body(request: &HttpRequest) -> Option<&Value> {
    match &request.body {
        RequestBody::Json(body) => Some(body),
        _ => None,
    }
}

/// A canned response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedResponse(RawResponse);

impl ScriptedResponse {
    /// Response with a JSON body.
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self::bytes(status, body.to_string().as_bytes())
    }

    /// Response with no body.
    #[must_use]
    pub const fn empty(status: u16) -> Self {
        Self(RawResponse {
            status,
            body: Vec::new(),
        })
    }

    /// Response with a plain-text body.
    #[must_use]
    pub fn text(status: u16, body: &str) -> Self {
        Self::bytes(status, body.as_bytes())
    }

    /// Response with a raw body.
    #[must_use]
    pub fn bytes(status: u16, body: &[u8]) -> Self {
        Self(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[derive(Debug, Default)]
struct State {
    routes: HashMap<(String, String), VecDeque<ScriptedResponse>>,
    requests: Vec<HttpRequest>,
}

/// Scripted transport. Clones share routes and the request log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<State>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method` on `path`.
    pub fn on(&self, method: &str, path: &str, response: ScriptedResponse) -> &Self {
        self.lock()
            .routes
            .entry((method.to_ascii_uppercase(), normalize(path).to_owned()))
            .or_default()
            .push_back(response);
        self
    }

    /// Queue a JSON response for `method` on `path`.
    pub fn on_json(&self, method: &str, path: &str, status: u16, body: &Value) -> &Self {
        self.on(method, path, ScriptedResponse::json(status, body))
    }

    /// Every request sent so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Requests sent to `method` on `path`.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<HttpRequest> {
        let path = normalize(path);
        self.lock()
            .requests
            .iter()
            .filter(|r| {
                r.method.as_str().eq_ignore_ascii_case(method) && normalize(r.url.path()) == path
            })
            .cloned()
            .collect()
    }

    /// Number of requests sent to `method` on `path`.
    #[must_use]
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, ApiError> {
        let key = (
            request.method.as_str().to_owned(),
            normalize(request.url.path()).to_owned(),
        );

        let mut state = self.lock();
        state.requests.push(request);

        let response = match state.routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        Ok(response.map_or_else(|| ScriptedResponse::empty(404).0, |r| r.0))
    }
}

fn normalize(path: &str) -> &str {
    let path = path.trim_start_matches('/');
    path.strip_prefix(API_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}
