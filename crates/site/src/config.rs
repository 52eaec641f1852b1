//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_BASE_URL` - Public URL for the site
//! - `ADMIN_USERNAME` - Admin login name
//! - `ADMIN_PASSWORD_HASH` - Argon2 PHC hash of the admin password
//!   (generate with `herreria hash-password`)
//! - `FIRESTORE_PROJECT_ID` - Firestore project (not needed with `SITE_STORE=memory`)
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_STORE` - `firestore` (default) or `memory`
//! - `FIRESTORE_ENDPOINT` - REST endpoint (default: <https://firestore.googleapis.com/v1>)
//! - `FIRESTORE_DATABASE` - Database id (default: `(default)`)
//! - `FIRESTORE_API_KEY` - Web API key
//! - `FIRESTORE_BEARER_TOKEN` - OAuth access token
//! - `FIRESTORE_TIMEOUT_SECS` - Request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use argon2::PasswordHash;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Which record store backs the catalog
    pub store: StoreConfig,
    /// Admin credentials
    pub admin: AdminConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Record store selection.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Hosted Firestore database.
    Firestore(FirestoreConfig),
    /// In-process store; contents are lost on restart.
    Memory,
}

/// Firestore REST API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct FirestoreConfig {
    /// REST endpoint, e.g. <https://firestore.googleapis.com/v1>
    pub endpoint: String,
    pub project_id: String,
    /// Database id, usually `(default)`
    pub database: String,
    pub api_key: Option<SecretString>,
    pub bearer_token: Option<SecretString>,
    pub timeout: Duration,
}

impl std::fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("database", &self.database)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Admin login credentials.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: SecretString,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_var(env, "SITE_HOST", "127.0.0.1")?;
        let port = parse_var(env, "SITE_PORT", "3000")?;
        let base_url = required(env, "SITE_BASE_URL")?;

        let store = StoreConfig::from_source(env)?;

        let admin = AdminConfig::from_source(env)?;

        Ok(Self {
            host,
            port,
            base_url,
            store,
            admin,
            sentry_dsn: env("SENTRY_DSN"),
            sentry_environment: env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl StoreConfig {
    /// Load only the store selection, for tools that do not serve HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if store variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Self::from_source(&|key| std::env::var(key).ok())
    }

    fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match or_default(env, "SITE_STORE", "firestore").as_str() {
            "firestore" => Ok(Self::Firestore(FirestoreConfig::from_source(env)?)),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidEnvVar(
                "SITE_STORE".to_string(),
                format!("expected `firestore` or `memory`, got `{other}`"),
            )),
        }
    }
}

impl FirestoreConfig {
    fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout_secs: u64 = parse_var(env, "FIRESTORE_TIMEOUT_SECS", "10")?;
        Ok(Self {
            endpoint: or_default(env, "FIRESTORE_ENDPOINT", DEFAULT_FIRESTORE_ENDPOINT),
            project_id: required(env, "FIRESTORE_PROJECT_ID")?,
            database: or_default(env, "FIRESTORE_DATABASE", "(default)"),
            api_key: env("FIRESTORE_API_KEY").map(SecretString::from),
            bearer_token: env("FIRESTORE_BEARER_TOKEN").map(SecretString::from),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl AdminConfig {
    fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let username = required(env, "ADMIN_USERNAME")?;
        if username.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_USERNAME".to_string(),
                "must not be blank".to_string(),
            ));
        }

        let password_hash = SecretString::from(required(env, "ADMIN_PASSWORD_HASH")?);
        PasswordHash::new(password_hash.expose_secret()).map_err(|e| {
            ConfigError::InvalidEnvVar(
                "ADMIN_PASSWORD_HASH".to_string(),
                format!("not a PHC password hash: {e}"),
            )
        })?;

        Ok(Self {
            username,
            password_hash,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required variable.
fn required(env: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a variable with a default value.
fn or_default(env: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable with a default value.
fn parse_var<T>(
    env: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    or_default(env, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
