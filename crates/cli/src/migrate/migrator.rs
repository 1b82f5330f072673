use threeyd::api::UserQuery;
use threeyd::{ApiError, ReqwestTransport, ThreeYourMindClient, Transport};
use threeyd_core::{
    Address, AddressId, NewAddress, NewUser, OrganizationUser, PreferencesUpdate, UserId,
};
use tracing::instrument;

use super::{
    AddressFailure, MigrationError, MigrationRecord, MigrationReport, TransferError,
    log_transfer_failure,
};

/// Users per page while gathering.
const GATHER_PAGE_SIZE: u32 = 100;

/// Page size of the connection check.
const CONNECTION_PAGE_SIZE: u32 = 25;

/// Country set on target preferences when the origin has none.
const DEFAULT_COUNTRY: &str = "US";

/// Start of the platform's duplicate-email message. The platform has shipped
/// it as both "already exits" and "already exists".
const DUPLICATE_EMAIL_MESSAGE: &str = "A user with this email address already exi";

/// Copies users from an origin platform to a target platform.
#[derive(Debug)]
pub struct UserMigrator<T: Transport = ReqwestTransport> {
    origin: ThreeYourMindClient<T>,
    target: ThreeYourMindClient<T>,
}

impl<T: Transport> UserMigrator<T> {
    #[must_use]
    pub const fn new(origin: ThreeYourMindClient<T>, target: ThreeYourMindClient<T>) -> Self {
        Self { origin, target }
    }

    /// Fetch the first user page of both platforms and log their counts.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Connection` naming the platform that failed.
    pub async fn test_connections(&self) -> Result<(), MigrationError> {
        for (system, client) in [("origin", &self.origin), ("target", &self.target)] {
            let page = client
                .organization_panel()
                .get_users(UserQuery::paged(1, CONNECTION_PAGE_SIZE))
                .await
                .map_err(|source| MigrationError::Connection { system, source })?;
            tracing::info!("Connected to {system}: {} users", page.count);
        }
        Ok(())
    }

    /// All users of the origin organization.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::GatherUsers` if any page fails; no partial
    /// list is returned.
    pub async fn gather_users(&self) -> Result<Vec<OrganizationUser>, MigrationError> {
        let panel = self.origin.organization_panel();
        let mut users = Vec::new();
        let mut page = 1;

        loop {
            let result = panel
                .get_users(UserQuery::paged(page, GATHER_PAGE_SIZE))
                .await
                .map_err(MigrationError::GatherUsers)?;
            let expected = usize::try_from(result.count).unwrap_or(usize::MAX);

            if result.results.is_empty() {
                if users.len() < expected {
                    tracing::warn!(
                        "Page {page} is empty after {} of {expected} users, stopping",
                        users.len()
                    );
                }
                break;
            }

            users.extend(result.results);
            tracing::info!("Gathered {}/{expected} users", users.len());

            if users.len() >= expected {
                break;
            }
            page += 1;
        }

        Ok(users)
    }

    /// Gather every origin user and transfer them one by one.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::GatherUsers` if the user list cannot be
    /// gathered. Per-user failures end up in the report.
    pub async fn migrate(&self) -> Result<MigrationReport, MigrationError> {
        let users = self.gather_users().await?;
        let mut report = MigrationReport::default();

        for user in &users {
            let record = match self.transfer_user(user).await {
                Ok(()) => MigrationRecord::success(user.id),
                Err(e) => {
                    log_transfer_failure(user.id, &e);
                    MigrationRecord::failed(user.id, &e)
                }
            };
            report.records.push(record);
        }

        report.log_summary();
        Ok(report)
    }

    /// Create `user` on the target and copy preferences and addresses.
    ///
    /// Steps already done are not rolled back when a later one fails.
    ///
    /// # Errors
    ///
    /// Returns the `TransferError` of the first failing step. Address
    /// failures are collected over all addresses.
    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    pub async fn transfer_user(&self, user: &OrganizationUser) -> Result<(), TransferError> {
        let created = self
            .target
            .organization_panel()
            .create_user(&NewUser::active(&user.email, &user.first_name, &user.last_name))
            .await
            .map_err(|e| {
                if e.to_string().contains(DUPLICATE_EMAIL_MESSAGE) {
                    TransferError::EmailAlreadyExists
                } else {
                    TransferError::CreateUser(e)
                }
            })?;

        self.transfer_preferences(user.id, created.id)
            .await
            .map_err(TransferError::TransferPreferences)?;

        self.transfer_addresses(user, created.id).await
    }

    async fn transfer_preferences(
        &self,
        origin_id: UserId,
        target_id: UserId,
    ) -> Result<(), ApiError> {
        let mut preferences = self
            .origin
            .organization_panel()
            .get_user_preferences(origin_id)
            .await?;
        if preferences.country.is_none() {
            preferences.country = Some(DEFAULT_COUNTRY.to_string());
        }

        self.target
            .organization_panel()
            .update_user_preferences(target_id, PreferencesUpdate::from(preferences))
            .await?;
        Ok(())
    }

    async fn transfer_addresses(
        &self,
        user: &OrganizationUser,
        target_id: UserId,
    ) -> Result<(), TransferError> {
        let mut addresses = self
            .origin
            .organization_panel()
            .get_user_addresses(user.id)
            .await
            .map_err(|error| TransferError::TransferAddresses {
                failures: vec![AddressFailure {
                    address_id: None,
                    error,
                }],
            })?;

        // The first address created becomes the target's default.
        sort_by_proximity(&mut addresses, user.default_address_id);

        let panel = self.target.organization_panel();
        let mut failures = Vec::new();
        for address in &addresses {
            if let Err(error) = panel
                .create_user_address(target_id, NewAddress::from(address))
                .await
            {
                failures.push(AddressFailure {
                    address_id: Some(address.id),
                    error,
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(TransferError::TransferAddresses { failures })
        }
    }
}

/// Order addresses by id distance to the default address, closest first.
/// Ties keep their order; without a default the order is unchanged.
pub fn sort_by_proximity(addresses: &mut [Address], default: Option<AddressId>) {
    if let Some(default) = default {
        addresses.sort_by_key(|address| address.id.as_i64().abs_diff(default.as_i64()));
    }
}
