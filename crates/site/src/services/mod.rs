//! Business logic services for the site.
//!
//! # Services
//!
//! - `auth` - Admin credential verification and password hashing

pub mod auth;

pub use auth::{AdminAuthenticator, AuthError, hash_password};
