// Session lifecycle: exclusive owner of the credential state

mod refresh;
mod store;
mod types;

pub use store::CredentialStore;
pub use types::{Credentials, SessionEvent, SessionListener};

use std::sync::{Arc, RwLock as StdRwLock};

use anyhow::Context;
use reqwest::{Client, Url};
use tokio::sync::{Mutex, RwLock};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::User;

/// Session manager
/// Owns the token pair and the cached user record; all reads and writes of
/// credential state go through here. Notifies subscribers on every change.
pub struct SessionManager {
    /// Durable backing store
    store: CredentialStore,

    /// Current token pair; `None` when logged out
    credentials: RwLock<Option<Credentials>>,

    /// Cached user record for the authenticated session
    user: RwLock<Option<User>>,

    /// Lifecycle subscribers
    listeners: StdRwLock<Vec<Arc<dyn SessionListener>>>,

    /// Serializes refresh attempts so concurrent 401s produce one call
    refresh_lock: Mutex<()>,

    /// HTTP client for refresh requests
    client: Client,

    /// Refresh endpoint
    refresh_url: Url,
}

impl SessionManager {
    /// Create a session manager backed by the configured store path,
    /// restoring any persisted session.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let store = CredentialStore::open(&config.store_path)?;
        Self::with_store(config, store)
    }

    /// Create a session manager over an explicit store (used by tests).
    pub fn with_store(config: &ClientConfig, store: CredentialStore) -> Result<Self> {
        let credentials = store.load()?;
        let user = store.load_user()?;
        if credentials.is_some() {
            tracing::info!("Restored persisted session");
        }

        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout))
            .timeout(std::time::Duration::from_secs(config.request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            store,
            credentials: RwLock::new(credentials),
            user: RwLock::new(user),
            listeners: StdRwLock::new(Vec::new()),
            refresh_lock: Mutex::new(()),
            client,
            refresh_url: config.endpoint("/api/auth/refresh")?,
        })
    }

    /// Register a lifecycle subscriber.
    pub fn subscribe(&self, listener: Arc<dyn SessionListener>) {
        self.listeners
            .write()
            .expect("listener registry poisoned")
            .push(listener);
    }

    fn notify(&self, event: SessionEvent) {
        let listeners = self.listeners.read().expect("listener registry poisoned");
        for listener in listeners.iter() {
            listener.on_session_event(event);
        }
    }

    /// Current access token, if a session exists.
    pub async fn access_token(&self) -> Option<String> {
        let credentials = self.credentials.read().await;
        credentials.as_ref().map(|c| c.access_token.clone())
    }

    /// Current refresh token, if a session exists.
    pub async fn refresh_token(&self) -> Option<String> {
        let credentials = self.credentials.read().await;
        credentials.as_ref().map(|c| c.refresh_token.clone())
    }

    /// Cached user record for the authenticated session.
    pub async fn current_user(&self) -> Option<User> {
        let user = self.user.read().await;
        user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.credentials.read().await.is_some()
    }

    /// Store a fresh token pair and user after login or registration.
    pub async fn establish(
        &self,
        access_token: String,
        refresh_token: String,
        user: User,
    ) -> Result<()> {
        let credentials = Credentials {
            access_token,
            refresh_token,
        };
        self.store.save(&credentials)?;
        self.store.save_user(&user)?;

        {
            let mut guard = self.credentials.write().await;
            *guard = Some(credentials);
        }
        {
            let mut guard = self.user.write().await;
            *guard = Some(user);
        }

        self.notify(SessionEvent::Established);
        Ok(())
    }

    /// Update the cached user record (e.g. after GET /me).
    pub async fn cache_user(&self, user: User) -> Result<()> {
        self.store.save_user(&user)?;
        let mut guard = self.user.write().await;
        *guard = Some(user);
        Ok(())
    }

    /// End the session: remove tokens and the cached user.
    pub async fn clear(&self) -> Result<()> {
        self.clear_internal().await?;
        self.notify(SessionEvent::Cleared);
        Ok(())
    }

    async fn clear_internal(&self) -> Result<()> {
        self.store.clear()?;
        {
            let mut guard = self.credentials.write().await;
            *guard = None;
        }
        {
            let mut guard = self.user.write().await;
            *guard = None;
        }
        Ok(())
    }

    /// Drive the refresh protocol for a request that saw a 401 while
    /// carrying `stale_token`.
    ///
    /// At most one refresh call is in flight at a time; a caller whose
    /// token was already replaced by a concurrent refresh gets the new
    /// token without a second call. On refresh failure the session is
    /// cleared and the terminal `SessionExpired` error is returned.
    pub async fn refresh(&self, stale_token: &str) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        // A concurrent 401 may have refreshed while we waited for the lock
        let refresh_token = {
            let credentials = self.credentials.read().await;
            match credentials.as_ref() {
                Some(c) if c.access_token != stale_token => {
                    tracing::debug!("Token already refreshed by a concurrent request");
                    return Ok(c.access_token.clone());
                }
                Some(c) => c.refresh_token.clone(),
                None => return Err(Error::SessionExpired),
            }
        };

        match refresh::refresh_access_token(&self.client, &self.refresh_url, &refresh_token).await
        {
            Ok(access_token) => {
                self.store.save_access_token(&access_token)?;
                {
                    let mut guard = self.credentials.write().await;
                    if let Some(credentials) = guard.as_mut() {
                        credentials.access_token = access_token.clone();
                    }
                }
                self.notify(SessionEvent::Refreshed);
                Ok(access_token)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Token refresh failed, clearing session");
                self.clear_internal().await?;
                self.notify(SessionEvent::Cleared);
                Err(Error::SessionExpired)
            }
        }
    }
}
