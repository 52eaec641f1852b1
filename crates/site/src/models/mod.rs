//! Domain models for the site.
//!
//! Catalog records live in `herreria-core`; this module only holds what the
//! site keeps in its own sessions.

pub mod session;

pub use session::{AdminSession, keys as session_keys};
