//! The client entry point and its namespaces.

use std::sync::Arc;

use crate::ApiError;
use crate::api::{Common, MyProfile, OrganizationPanel, UserPanel};
use crate::config::{AnalysisPolicy, ClientConfig};
use crate::gateway::Gateway;
use crate::transport::{ReqwestTransport, Transport};

/// 3YOURMIND REST API client.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
pub struct ThreeYourMindClient<T = ReqwestTransport> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T> {
    gateway: Gateway<T>,
    analysis: AnalysisPolicy,
}

impl ThreeYourMindClient {
    /// Create a client that talks HTTP through `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }
}

impl<T: Transport> ThreeYourMindClient<T> {
    /// Create a client on top of a custom transport.
    #[must_use]
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                gateway: Gateway::new(config, transport),
                analysis: config.analysis,
            }),
        }
    }

    /// Platform-wide lists: colors, units, countries, currencies, materials.
    #[must_use]
    pub fn common(&self) -> Common<'_, T> {
        Common::new(self)
    }

    /// Preferences, profile and addresses of the token's user.
    #[must_use]
    pub fn my_profile(&self) -> MyProfile<'_, T> {
        MyProfile::new(self)
    }

    /// User administration of the token's organization.
    #[must_use]
    pub fn organization_panel(&self) -> OrganizationPanel<'_, T> {
        OrganizationPanel::new(self)
    }

    /// Baskets, CAD uploads, quotes, orders and the catalog.
    #[must_use]
    pub fn user_panel(&self) -> UserPanel<'_, T> {
        UserPanel::new(self)
    }

    /// The request gateway, for endpoints without a namespace method.
    #[must_use]
    pub fn gateway(&self) -> &Gateway<T> {
        &self.inner.gateway
    }

    /// File analysis polling settings.
    #[must_use]
    pub fn analysis_policy(&self) -> AnalysisPolicy {
        self.inner.analysis
    }
}

impl<T> Clone for ThreeYourMindClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ThreeYourMindClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreeYourMindClient")
            .field("analysis", &self.inner.analysis)
            .finish_non_exhaustive()
    }
}
