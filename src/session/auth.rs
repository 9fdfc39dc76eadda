//! Credential validation and the authenticator port.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;

use super::user::{mock_profile, User};

/// Sign-in failures. The display text is shown verbatim under the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please enter both email and password")]
    MissingCredentials,

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Could not save your session: {0}")]
    Storage(String),
}

/// `local@domain.tld` with no whitespace
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Email and password that passed local validation
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Validate raw form input.
    ///
    /// Checks run in a fixed order: missing fields, email shape, password
    /// length. The email is trimmed; the password is taken as typed.
    pub fn parse(email: &str, password: &str, min_password_length: usize) -> Result<Self, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if !is_valid_email(email) {
            return Err(AuthError::InvalidCredentials);
        }
        if password.chars().count() < min_password_length {
            return Err(AuthError::WeakPassword {
                min: min_password_length,
            });
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Turns validated credentials into a user profile.
///
/// A real implementation (password hash lookup, external identity provider)
/// can replace [`MockAuthenticator`] without touching the session store.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthError>;
}

/// Accepts any credentials that passed local validation after a fixed delay
pub struct MockAuthenticator {
    latency: Duration,
}

impl MockAuthenticator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(mock_profile(&credentials.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_checked_first() {
        assert_eq!(
            Credentials::parse("", "", 8).unwrap_err(),
            AuthError::MissingCredentials
        );
        assert_eq!(
            Credentials::parse("a@b.com", "", 8).unwrap_err(),
            AuthError::MissingCredentials
        );
        assert_eq!(
            Credentials::parse("   ", "12345678", 8).unwrap_err(),
            AuthError::MissingCredentials
        );
    }

    #[test]
    fn test_bad_email_shape_is_invalid_credentials() {
        for email in ["plain", "no@tld", "two@@b.com", "sp ace@b.com"] {
            assert_eq!(
                Credentials::parse(email, "12345678", 8).unwrap_err(),
                AuthError::InvalidCredentials,
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_short_password_is_weak() {
        assert_eq!(
            Credentials::parse("a@b.com", "short", 8).unwrap_err(),
            AuthError::WeakPassword { min: 8 }
        );
    }

    #[test]
    fn test_password_length_counts_characters() {
        // 8 characters, more than 8 bytes
        assert!(Credentials::parse("a@b.com", "éééééééé", 8).is_ok());
        assert!(Credentials::parse("a@b.com", "ééééééé", 8).is_err());
    }

    #[test]
    fn test_email_is_trimmed() {
        let creds = Credentials::parse("  a@b.com ", "12345678", 8).unwrap();
        assert_eq!(creds.email, "a@b.com");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::parse("a@b.com", "hunter2hunter2", 8).unwrap();
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("a@b.com"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AuthError::WeakPassword { min: 8 }.to_string(),
            "Password must be at least 8 characters"
        );
        assert_eq!(
            AuthError::MissingCredentials.to_string(),
            "Please enter both email and password"
        );
    }

    #[tokio::test]
    async fn test_mock_authenticator_returns_template_with_email() {
        let creds = Credentials::parse("x@y.org", "12345678", 8).unwrap();
        let user = MockAuthenticator::instant()
            .authenticate(&creds)
            .await
            .unwrap();
        assert_eq!(user.email, "x@y.org");
        assert_eq!(user.id, mock_profile("other@y.org").id);
    }
}
