//! Error type for every client operation.

use serde_json::Value;
use thiserror::Error;
use threeyd_core::AnalysisStatus;
use uuid::Uuid;

/// Errors that can occur when talking to the 3YOURMIND API.
///
/// The first four variants carry the parsed response payload, which usually
/// holds the platform's validation messages.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404 response.
    #[error("Object not found: {0}")]
    ObjectNotFound(Value),

    /// 401 response (missing or invalid access token).
    #[error("Unauthorized: {0}")]
    Unauthorized(Value),

    /// 400 response.
    #[error("Bad request: {0}")]
    BadRequest(Value),

    /// 405 response.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(Value),

    /// 5xx (or any non-4xx/2xx/3xx) response, with the raw body.
    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    /// A caller-supplied argument cannot be used.
    #[error("Bad argument: {0}")]
    BadArgument(String),

    /// The uploaded file failed analysis or did not finish in time.
    #[error("File analysis of {uuid} ended with status '{status}' after {attempts} checks")]
    FileAnalysis {
        uuid: Uuid,
        status: AnalysisStatus,
        attempts: u32,
    },

    /// A CAD or attachment file could not be read or downloaded.
    #[error("CAD file not found: {location}: {reason}")]
    CadFileNotFound { location: String, reason: String },

    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The response payload of a 400/401/404/405 error.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        match self {
            Self::ObjectNotFound(payload)
            | Self::Unauthorized(payload)
            | Self::BadRequest(payload)
            | Self::MethodNotAllowed(payload) => Some(payload),
            _ => None,
        }
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ObjectNotFound(_) => "object_not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::BadRequest(_) => "bad_request",
            Self::MethodNotAllowed(_) => "method_not_allowed",
            Self::ServerError { .. } => "server_error",
            Self::BadArgument(_) => "bad_argument",
            Self::FileAnalysis { .. } => "file_analysis",
            Self::CadFileNotFound { .. } => "cad_file_not_found",
            Self::Http(_) => "http",
            Self::Decode(_) => "decode",
        }
    }
}
