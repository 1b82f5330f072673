//! User migration command.
//!
//! # Usage
//!
//! ```bash
//! # Check both platforms are reachable
//! threeyd migrate-users --check-connections
//!
//! # Migrate and write the report to log.json
//! threeyd migrate-users
//! ```
//!
//! # Environment Variables
//!
//! - `ORIGIN_BASE_URL`, `ORIGIN_ACCESS_TOKEN` - platform to copy users from
//! - `TARGET_BASE_URL`, `TARGET_ACCESS_TOKEN` - platform to copy users to
//!
//! Both tokens need organization panel access.

use std::path::Path;

use threeyd::{ClientConfig, ThreeYourMindClient};

use super::CommandError;
use crate::migrate::UserMigrator;
use crate::report;

/// Default report file.
pub const DEFAULT_REPORT: &str = "log.json";

/// Migrate all users, or only check the connections.
///
/// # Errors
///
/// Returns `CommandError` if the configuration is incomplete, the user list
/// cannot be gathered, a connection check fails, or the report cannot be
/// written. Failed users are reported, not returned.
pub async fn run(report_path: &Path, check_connections: bool) -> Result<(), CommandError> {
    let origin = ClientConfig::from_env("ORIGIN")?;
    let target = ClientConfig::from_env("TARGET")?;
    tracing::info!("Migrating users from {} to {}", origin.base_url, target.base_url);

    let migrator = UserMigrator::new(
        ThreeYourMindClient::new(&origin)?,
        ThreeYourMindClient::new(&target)?,
    );

    if check_connections {
        migrator.test_connections().await?;
        return Ok(());
    }

    let migration = migrator.migrate().await?;
    report::write_json(report_path, &migration).await?;
    Ok(())
}
