//! Session-related types.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session-stored admin capability.
///
/// Holding one of these (through the `RequireAdmin` extractor) is what allows a
/// handler to modify the catalog. There is no global "logged in" flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    /// Admin login name.
    pub username: String,
    /// When the admin logged in.
    pub signed_in_at: DateTime<Utc>,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current admin capability.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
