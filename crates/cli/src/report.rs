//! Run reports.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Maximum length of an error reason in log lines.
pub const MAX_REASON_CHARS: usize = 256;

/// Errors writing a report file.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cut an error reason to [`MAX_REASON_CHARS`] characters for logging.
#[must_use]
pub fn truncate_reason(reason: &str) -> &str {
    reason
        .char_indices()
        .nth(MAX_REASON_CHARS)
        .and_then(|(end, _)| reason.get(..end))
        .unwrap_or(reason)
}

/// Write `report` as pretty-printed JSON, replacing any existing file.
///
/// # Errors
///
/// Returns `ReportError` if serialization or the write fails.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, report: &T) -> Result<(), ReportError> {
    let json = serde_json::to_vec_pretty(report)?;
    tokio::fs::write(path, json).await?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}
