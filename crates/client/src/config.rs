//! Client configuration loaded from environment variables.
//!
//! Every platform the tools talk to is configured through a variable prefix,
//! so one process can hold credentials for several platforms at once (the
//! user migration reads `ORIGIN_*` and `TARGET_*`).
//!
//! # Environment Variables
//!
//! ## Required
//! - `<PREFIX>_BASE_URL` - Platform URL, ex. `https://example.3yourmind.com`
//! - `<PREFIX>_ACCESS_TOKEN` - API access token
//!
//! ## Optional
//! - `<PREFIX>_ANALYSIS_MAX_ATTEMPTS` - File status checks before giving up (default: 120)
//! - `<PREFIX>_ANALYSIS_DELAY_MS` - Delay between file status checks (default: 1200)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_ANALYSIS_MAX_ATTEMPTS: u32 = 120;
const DEFAULT_ANALYSIS_DELAY_MS: u64 = 1200;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How long to wait for server-side CAD file analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisPolicy {
    /// Number of status checks before the analysis is considered failed.
    pub max_attempts: u32,
    /// Pause between two status checks.
    pub delay: Duration,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_ANALYSIS_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS),
        }
    }
}

/// Connection settings for one platform.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Platform base URL; the API lives under `<base_url>/api/v2.0/`
    pub base_url: Url,
    /// API access token sent as `Authorization: Token <token>`
    pub access_token: SecretString,
    /// CAD file analysis polling
    pub analysis: AnalysisPolicy,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"[REDACTED]")
            .field("analysis", &self.analysis)
            .finish()
    }
}

impl ClientConfig {
    /// Build a configuration with the default analysis policy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str, access_token: SecretString) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            access_token,
            analysis: AnalysisPolicy::default(),
        })
    }

    /// Replace the analysis policy.
    #[must_use]
    pub const fn with_analysis(mut self, analysis: AnalysisPolicy) -> Self {
        self.analysis = analysis;
        self
    }

    /// Load configuration from `<prefix>_*` environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url_key = format!("{prefix}_BASE_URL");
        let base_url = parse_base_url(&base_url_key, &get_required_env(&base_url_key)?)?;
        let access_token = get_required_secret(&format!("{prefix}_ACCESS_TOKEN"))?;

        let max_attempts_key = format!("{prefix}_ANALYSIS_MAX_ATTEMPTS");
        let max_attempts = get_env_or_default(
            &max_attempts_key,
            &DEFAULT_ANALYSIS_MAX_ATTEMPTS.to_string(),
        )
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar(max_attempts_key.clone(), e.to_string()))?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                max_attempts_key,
                "must be at least 1".to_string(),
            ));
        }

        let delay_key = format!("{prefix}_ANALYSIS_DELAY_MS");
        let delay_ms = get_env_or_default(&delay_key, &DEFAULT_ANALYSIS_DELAY_MS.to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(delay_key, e.to_string()))?;

        Ok(Self {
            base_url,
            access_token,
            analysis: AnalysisPolicy {
                max_attempts,
                delay: Duration::from_millis(delay_ms),
            },
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(SecretString::from(value))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_default_analysis_policy() {
        let policy = AnalysisPolicy::default();
        assert_eq!(policy.max_attempts, 120);
        assert_eq!(policy.delay, Duration::from_millis(1200));
    }

    #[test]
    fn test_new_rejects_relative_url() {
        let result = ClientConfig::new("example.com", SecretString::from("token"));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        let result = ClientConfig::new("ftp://example.com", SecretString::from("token"));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_from_env_missing_variables() {
        let result = ClientConfig::from_env("THREEYD_TEST_UNSET_PREFIX");
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(key)) if key == "THREEYD_TEST_UNSET_PREFIX_BASE_URL"));
    }

    #[test]
    fn test_config_debug_redacts_token() {
        let config = ClientConfig::new(
            "https://example.3yourmind.com",
            SecretString::from("super_secret_access_token"),
        )
        .unwrap();

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("example.3yourmind.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_access_token"));
        assert_eq!(
            config.access_token.expose_secret(),
            "super_secret_access_token"
        );
    }
}
