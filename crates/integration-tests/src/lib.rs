//! Integration tests for the 3YOURMIND client and tools.
//!
//! # Running Tests
//!
//! ```bash
//! # Scripted end-to-end tests (no network)
//! cargo test -p threeyd-integration-tests
//!
//! # Live tests against a platform
//! THREEYD_BASE_URL=https://example.3yourmind.com THREEYD_ACCESS_TOKEN=... \
//!     cargo test -p threeyd-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `catalog_import` - CSV file through the importer against a scripted platform
//! - `user_migration` - origin and target platforms scripted side by side
//! - `live_platform` - read-only calls against a real platform (ignored by default)

use threeyd::{ClientConfig, ThreeYourMindClient};

/// Client for the platform configured in `THREEYD_*`, or `None` when the
/// variables are not set.
#[must_use]
pub fn live_client() -> Option<ThreeYourMindClient> {
    let config = ClientConfig::from_env("THREEYD").ok()?;
    ThreeYourMindClient::new(&config).ok()
}
