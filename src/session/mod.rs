//! Authenticated-user state.
//!
//! The application and the route guards depend on [`SessionService`]
//! rather than a global, so tests can substitute a fake that never touches
//! persisted storage.

pub mod auth;
pub mod store;
pub mod user;

pub use auth::{AuthError, Authenticator, Credentials, MockAuthenticator};
pub use store::{AuthMarker, SessionStore};
pub use user::{mock_profile, Organization, Role, User, UserPatch};

use async_trait::async_trait;

#[async_trait]
pub trait SessionService: Send + Sync {
    /// Restore the session from persisted storage. Clears `is_loading`.
    fn initialize(&self);

    /// Validate credentials, authenticate and persist the marker.
    /// Nothing changes when this returns an error.
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Drop the session and its marker. Safe to call repeatedly.
    fn logout(&self);

    /// Merge `patch` into the current user; ignored without a session
    fn update_user(&self, patch: UserPatch);

    fn current_user(&self) -> Option<User>;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// True until `initialize` has resolved
    fn is_loading(&self) -> bool;
}
