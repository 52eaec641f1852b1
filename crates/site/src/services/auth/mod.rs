//! Authentication service.
//!
//! The site has a single admin account configured through the environment.
//! Logging in exchanges its credentials for an [`AdminSession`] capability.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};

use crate::config::AdminConfig;
use crate::models::AdminSession;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 10;

/// Verifies admin credentials.
#[derive(Clone)]
pub struct AdminAuthenticator {
    username: String,
    password_hash: SecretString,
}

impl AdminAuthenticator {
    /// Create an authenticator for the configured admin account.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            username: config.username.clone(),
            password_hash: config.password_hash.clone(),
        }
    }

    /// Check a username and password, returning the admin capability on success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if either value is wrong.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AdminSession, AuthError> {
        // Verify the password even for an unknown username so both failures
        // take the same time.
        let password_ok = verify_password(password, self.password_hash.expose_secret()).is_ok();

        if !password_ok || username != self.username {
            tracing::warn!(username = %username, "Admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(username = %username, "Admin logged in");
        Ok(AdminSession {
            username: self.username.clone(),
            signed_in_at: Utc::now(),
        })
    }
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id, for the `ADMIN_PASSWORD_HASH` setting.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn authenticator(password: &str) -> AdminAuthenticator {
        AdminAuthenticator::new(&AdminConfig {
            username: "taller".to_string(),
            password_hash: SecretString::from(hash_password(password).unwrap()),
        })
    }

    #[test]
    fn test_hash_password_rejects_short() {
        assert!(matches!(
            hash_password("corta"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_hash_is_phc_string() {
        let hash = hash_password("hierro-forjado-2024").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hierro-forjado-2024", &hash).is_ok());
    }

    #[test]
    fn test_authenticate_success() {
        let session = authenticator("hierro-forjado-2024")
            .authenticate("taller", "hierro-forjado-2024")
            .unwrap();
        assert_eq!(session.username, "taller");
    }

    #[test]
    fn test_authenticate_wrong_password() {
        let result = authenticator("hierro-forjado-2024").authenticate("taller", "otra-clave-123");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_authenticate_wrong_username() {
        let result =
            authenticator("hierro-forjado-2024").authenticate("admin", "hierro-forjado-2024");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
