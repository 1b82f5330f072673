//! CAD and attachment file sources.
//!
//! A file to upload can live on disk, behind a URL, or already be in memory.
//! [`FileSource::resolve`] turns any of them into the bytes sent in the
//! multipart body.

use std::path::PathBuf;

use reqwest::Method;
use url::Url;

use crate::ApiError;
use crate::transport::{FilePart, HttpRequest, RequestBody, Transport};

/// File name used for files downloaded from a URL.
const DOWNLOADED_FILE_NAME: &str = "originalFile.stl";

/// Where the bytes of an uploaded file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A local file.
    Path(PathBuf),
    /// A file downloaded with an unauthenticated GET.
    Url(Url),
    /// File contents already in memory.
    Bytes { file_name: String, data: Vec<u8> },
}

/// File contents ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResolvedFile {
    /// Multipart part under the given form field.
    #[must_use]
    pub fn into_part(self, field: &str) -> FilePart {
        FilePart {
            field: field.to_owned(),
            file_name: self.file_name,
            bytes: self.bytes,
        }
    }
}

impl FileSource {
    /// Interpret a string as a URL (when it starts with `http`) or a path.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadArgument` for an empty string or an `http...`
    /// string that is not a valid http(s) URL.
    pub fn parse(value: &str) -> Result<Self, ApiError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ApiError::BadArgument(
                "file must be either a path, a URL or file contents".to_string(),
            ));
        }

        if value.starts_with("http") {
            let url = Url::parse(value)
                .map_err(|e| ApiError::BadArgument(format!("invalid file URL '{value}': {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ApiError::BadArgument(format!(
                    "unsupported file URL scheme '{}'",
                    url.scheme()
                )));
            }
            return Ok(Self::Url(url));
        }

        Ok(Self::Path(PathBuf::from(value)))
    }

    /// Human-readable location for logs and errors.
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.to_string(),
            Self::Bytes { file_name, .. } => format!("<memory:{file_name}>"),
        }
    }

    /// Read, download or pass through the file contents.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::CadFileNotFound` if the file cannot be read, the
    /// download fails, or the download does not answer with a 2xx status.
    pub async fn resolve<T: Transport>(&self, transport: &T) -> Result<ResolvedFile, ApiError> {
        match self {
            Self::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| not_found(self, &e))?;
                let file_name = path
                    .file_name()
                    .map_or_else(|| path.display().to_string(), |name| {
                        name.to_string_lossy().into_owned()
                    });
                Ok(ResolvedFile { file_name, bytes })
            }
            Self::Url(url) => {
                let response = transport
                    .send(HttpRequest {
                        method: Method::GET,
                        url: url.clone(),
                        authorization: None,
                        body: RequestBody::Empty,
                    })
                    .await
                    .map_err(|e| not_found(self, &e))?;

                if !(200..300).contains(&response.status) {
                    return Err(ApiError::CadFileNotFound {
                        location: self.location(),
                        reason: format!(
                            "download returned status {}: {}",
                            response.status,
                            String::from_utf8_lossy(&response.body)
                        ),
                    });
                }

                Ok(ResolvedFile {
                    file_name: DOWNLOADED_FILE_NAME.to_string(),
                    bytes: response.body,
                })
            }
            Self::Bytes { file_name, data } => Ok(ResolvedFile {
                file_name: file_name.clone(),
                bytes: data.clone(),
            }),
        }
    }
}

impl From<PathBuf> for FileSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Url> for FileSource {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

fn not_found(source: &FileSource, error: &dyn std::fmt::Display) -> ApiError {
    ApiError::CadFileNotFound {
        location: source.location(),
        reason: error.to_string(),
    }
}
