//! User migration between two platforms.
//!
//! Users are gathered from the origin's organization panel and recreated on
//! the target one at a time, with their preferences and addresses. A failure
//! for one user is recorded in the [`MigrationReport`] and the run moves on;
//! only gathering the user list aborts it.

use serde::Serialize;
use thiserror::Error;
use threeyd::ApiError;
use threeyd_core::{AddressId, UserId};

use crate::report::{ReportError, truncate_reason};

mod migrator;

pub use migrator::{UserMigrator, sort_by_proximity};

/// Errors that abort a migration run.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to gather users from origin: {0}")]
    GatherUsers(#[source] ApiError),

    #[error("Cannot reach {system}: {source}")]
    Connection {
        system: &'static str,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// One address that could not be copied.
#[derive(Debug)]
pub struct AddressFailure {
    /// `None` when the origin's address list itself could not be read.
    pub address_id: Option<AddressId>,
    pub error: ApiError,
}

/// Why a single user was not fully transferred.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The target already has a user with this email. Not a failure of the
    /// run; the user is left as it is.
    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("{0}")]
    CreateUser(#[source] ApiError),

    #[error("{0}")]
    TransferPreferences(#[source] ApiError),

    #[error("{}", describe_address_failures(.failures))]
    TransferAddresses { failures: Vec<AddressFailure> },
}

impl TransferError {
    /// Report stage, `None` for an existing email.
    #[must_use]
    pub const fn stage(&self) -> Option<TransferStage> {
        match self {
            Self::EmailAlreadyExists => None,
            Self::CreateUser(_) => Some(TransferStage::CreateUser),
            Self::TransferPreferences(_) => Some(TransferStage::TransferPreferences),
            Self::TransferAddresses { .. } => Some(TransferStage::TransferAddresses),
        }
    }
}

fn describe_address_failures(failures: &[AddressFailure]) -> String {
    failures
        .iter()
        .map(|failure| match failure.address_id {
            Some(id) => format!("address {id}: {}", failure.error),
            None => format!("addresses: {}", failure.error),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// The step a user transfer failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStage {
    CreateUser,
    TransferPreferences,
    TransferAddresses,
}

impl TransferStage {
    pub const ALL: [Self; 3] = [
        Self::CreateUser,
        Self::TransferPreferences,
        Self::TransferAddresses,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateUser => "create_user",
            Self::TransferPreferences => "transfer_preferences",
            Self::TransferAddresses => "transfer_addresses",
        }
    }
}

impl std::fmt::Display for TransferStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for one origin user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationRecord {
    /// Id on the origin platform.
    pub user_id: UserId,
    pub error: Option<TransferStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
}

impl MigrationRecord {
    #[must_use]
    pub const fn success(user_id: UserId) -> Self {
        Self {
            user_id,
            error: None,
            error_reason: None,
        }
    }

    #[must_use]
    pub fn failed(user_id: UserId, error: &TransferError) -> Self {
        Self {
            user_id,
            error: error.stage(),
            error_reason: Some(error.to_string()),
        }
    }

    /// Transferred, or skipped because the email already exists.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-user outcomes in origin order. Serializes as a plain list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MigrationReport {
    pub records: Vec<MigrationRecord>,
}

impl MigrationReport {
    #[must_use]
    pub fn failed_at(&self, stage: TransferStage) -> usize {
        self.records
            .iter()
            .filter(|r| r.error == Some(stage))
            .count()
    }

    /// Users skipped because their email already exists on the target.
    #[must_use]
    pub fn existing(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.is_success() && r.error_reason.is_some())
            .count()
    }

    /// Log totals and failures per stage.
    pub fn log_summary(&self) {
        let total = self.records.len();
        let failed = self.records.iter().filter(|r| !r.is_success()).count();
        tracing::info!("Migration has run");
        tracing::info!("Total users: {total}");
        tracing::info!("Successful transfers: {}", total - failed - self.existing());
        tracing::info!("Already existing: {}", self.existing());
        tracing::info!("Failed transfers: {failed}");
        for stage in TransferStage::ALL {
            tracing::info!("\tfailed at {stage}: {}", self.failed_at(stage));
        }
    }
}

fn log_transfer_failure(user_id: UserId, error: &TransferError) {
    let reason = error.to_string();
    match error.stage() {
        Some(stage) => {
            tracing::warn!("User {user_id}: {stage} failed: {}", truncate_reason(&reason));
        }
        None => tracing::info!("User {user_id}: {reason}"),
    }
}
