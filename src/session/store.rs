//! Session store: the single source of truth for who is signed in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::auth::{AuthError, Authenticator, Credentials, MockAuthenticator};
use super::user::{mock_profile, User, UserPatch};
use super::SessionService;
use crate::config::{AuthConfig, Config};
use crate::storage::{FileStore, KeyValueStore};

/// Minimal persisted authentication flag.
///
/// Only this marker survives a restart; the profile is rebuilt from the
/// mock template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthMarker {
    pub is_authenticated: bool,
    pub email: String,
}

impl AuthMarker {
    pub fn signed_in(email: &str) -> Self {
        Self {
            is_authenticated: true,
            email: email.to_string(),
        }
    }
}

enum MarkerRead {
    Absent,
    Present(AuthMarker),
    Malformed,
}

#[derive(Debug)]
struct SessionState {
    user: Option<User>,
    loading: bool,
}

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    authenticator: Arc<dyn Authenticator>,
    storage_key: String,
    min_password_length: usize,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        authenticator: Arc<dyn Authenticator>,
        auth: &AuthConfig,
    ) -> Self {
        Self {
            storage,
            authenticator,
            storage_key: auth.storage_key.clone(),
            min_password_length: auth.min_password_length,
            state: RwLock::new(SessionState {
                user: None,
                loading: true,
            }),
        }
    }

    /// File-backed store with the mock authenticator, as used by the binary
    pub fn from_config(config: &Config) -> Self {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.storage_file()));
        let authenticator: Arc<dyn Authenticator> =
            Arc::new(MockAuthenticator::new(config.auth.login_latency()));
        Self::new(storage, authenticator, &config.auth)
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.storage)
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn read_marker(&self) -> MarkerRead {
        let raw = match self.storage.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return MarkerRead::Absent,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read authentication marker");
                return MarkerRead::Absent;
            }
        };
        match serde_json::from_str::<AuthMarker>(&raw) {
            Ok(marker) => MarkerRead::Present(marker),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding malformed authentication marker");
                MarkerRead::Malformed
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionService for SessionStore {
    fn initialize(&self) {
        let user = match self.read_marker() {
            MarkerRead::Present(marker) if marker.is_authenticated => {
                tracing::debug!(email = %marker.email, "Restoring session from marker");
                Some(mock_profile(&marker.email))
            }
            MarkerRead::Present(_) | MarkerRead::Absent => None,
            MarkerRead::Malformed => {
                if let Err(e) = self.storage.remove(&self.storage_key) {
                    tracing::warn!(error = %e, "Failed to remove malformed marker");
                }
                None
            }
        };

        let mut state = self.write_state();
        state.user = user;
        state.loading = false;
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let credentials = Credentials::parse(email, password, self.min_password_length)?;
        let user = self.authenticator.authenticate(&credentials).await?;

        let marker = serde_json::to_string(&AuthMarker::signed_in(&user.email))
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        self.storage
            .set(&self.storage_key, &marker)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        tracing::info!(email = %user.email, role = ?user.role, "Signed in");
        self.write_state().user = Some(user.clone());
        Ok(user)
    }

    fn logout(&self) {
        let previous = self.write_state().user.take();
        if let Err(e) = self.storage.remove(&self.storage_key) {
            tracing::warn!(error = %e, "Failed to remove authentication marker");
        }
        if let Some(user) = previous {
            tracing::info!(email = %user.email, "Signed out");
        }
    }

    fn update_user(&self, patch: UserPatch) {
        let mut state = self.write_state();
        match state.user.as_mut() {
            Some(user) => {
                user.apply(patch);
                tracing::debug!(email = %user.email, "Profile updated");
            }
            None => tracing::debug!("Ignoring profile update without a session"),
        }
    }

    fn current_user(&self) -> Option<User> {
        self.read_state().user.clone()
    }

    fn is_loading(&self) -> bool {
        self.read_state().loading
    }
}
