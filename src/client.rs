// Top-level client wiring
// One session manager shared by the four per-service pipelines.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::ApiClient;
use crate::services::{AdminService, AuthService, NotificationService, PolicyService};
use crate::session::SessionManager;

/// The PolicyPulse client: auth, policy/bid listings, notifications and
/// the admin dashboard surface over a single shared session.
pub struct PolicyPulse {
    session: Arc<SessionManager>,
    pub auth: Arc<AuthService>,
    pub policies: PolicyService,
    pub notifications: NotificationService,
    pub admin: AdminService,
}

impl PolicyPulse {
    /// Build a client from explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let session = Arc::new(SessionManager::new(&config)?);
        Self::wire(config, session)
    }

    /// Build a client over an existing session manager (used by tests).
    pub fn with_session(config: ClientConfig, session: Arc<SessionManager>) -> Result<Self> {
        Self::wire(config, session)
    }

    fn wire(config: ClientConfig, session: Arc<SessionManager>) -> Result<Self> {
        let auth = Arc::new(AuthService::new(
            ApiClient::new(&config, "/api/auth", session.clone())?,
            session.clone(),
        ));
        let policies = PolicyService::new(ApiClient::new(&config, "/api", session.clone())?);
        let notifications =
            NotificationService::new(ApiClient::new(&config, "/api", session.clone())?);
        // Admin shares the session and its storage keys with everyone else
        let admin = AdminService::new(ApiClient::new(&config, "/api/admin", session.clone())?);

        Ok(Self {
            session,
            auth,
            policies,
            notifications,
            admin,
        })
    }

    /// Build a client from the environment (`POLICYPULSE_*` variables).
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }
}
