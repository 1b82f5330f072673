//! Status and unit enums used by the platform.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Server-side analysis state of an uploaded CAD file.
///
/// The platform reports `analysing` until the file has been processed and
/// `finished` afterwards. Any other value means the analysis failed; the raw
/// value is kept for error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisStatus {
    Analysing,
    Finished,
    Other(String),
}

impl AnalysisStatus {
    /// Wire value of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Analysing => "analysing",
            Self::Finished => "finished",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for AnalysisStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "analysing" => Self::Analysing,
            "finished" => Self::Finished,
            _ => Self::Other(value),
        }
    }
}

impl From<AnalysisStatus> for String {
    fn from(status: AnalysisStatus) -> Self {
        match status {
            AnalysisStatus::Other(value) => value,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of measure a CAD file is interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Mm,
    Inch,
}

impl Unit {
    /// Wire value of the unit.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mm => "mm",
            Self::Inch => "inch",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mm" => Ok(Self::Mm),
            "inch" => Ok(Self::Inch),
            other => Err(UnknownUnit(other.to_owned())),
        }
    }
}

/// Returned when parsing a unit other than `mm` or `inch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUnit(pub String);

impl fmt::Display for UnknownUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown unit '{}', expected 'mm' or 'inch'", self.0)
    }
}

impl std::error::Error for UnknownUnit {}

/// Publication state of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogStatus {
    #[default]
    Published,
    Unpublished,
}

impl std::str::FromStr for CatalogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(Self::Published),
            "unpublished" => Ok(Self::Unpublished),
            other => Err(format!("unknown catalog status '{other}'")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_status_from_wire() {
        let status: AnalysisStatus = serde_json::from_str(r#""analysing""#).unwrap();
        assert_eq!(status, AnalysisStatus::Analysing);

        let status: AnalysisStatus = serde_json::from_str(r#""finished""#).unwrap();
        assert_eq!(status, AnalysisStatus::Finished);

        let status: AnalysisStatus = serde_json::from_str(r#""failed""#).unwrap();
        assert_eq!(status, AnalysisStatus::Other("failed".to_string()));
        assert_eq!(status.to_string(), "failed");
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("inch".parse::<Unit>().unwrap(), Unit::Inch);
        assert!("cm".parse::<Unit>().is_err());
        assert_eq!(serde_json::to_string(&Unit::Mm).unwrap(), r#""mm""#);
    }

    #[test]
    fn test_catalog_status_serialization() {
        assert_eq!(
            serde_json::to_string(&CatalogStatus::Unpublished).unwrap(),
            r#""unpublished""#
        );
        assert_eq!(
            "published".parse::<CatalogStatus>().unwrap(),
            CatalogStatus::Published
        );
    }
}
