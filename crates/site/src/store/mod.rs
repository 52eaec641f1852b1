//! Record store access.
//!
//! # Architecture
//!
//! - The hosted document database is the source of truth - NO local cache
//! - Documents are untyped field maps; `catalog::schema` turns them into
//!   domain records
//! - Queries are limited to equality filters and full-collection scans
//!
//! # Implementations
//!
//! - [`FirestoreStore`] - Cloud Firestore over its REST API
//! - [`MemoryStore`] - In-process store for local development and tests
//!
//! # Example
//!
//! ```rust,ignore
//! use herreria_site::store::{Collection, FieldValue, MemoryStore, RecordStore};
//!
//! let store = MemoryStore::new();
//! let docs = store
//!     .query_eq(Collection::Products, "category", &FieldValue::from("rejas"))
//!     .await?;
//! ```

mod firestore;
mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::StoreConfig;

/// A named partition of the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Regular catalog products.
    Products,
    /// Curated landing-page products.
    FeaturedProducts,
}

impl Collection {
    /// The collection id in the store.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::FeaturedProducts => "featured_products",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Field map of a single document.
pub type Fields = BTreeMap<String, FieldValue>;

/// A dynamically-typed document field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<FieldValue>),
    Map(Fields),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// A document read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned document id.
    pub id: String,
    pub fields: Fields,
}

/// Errors that can occur when talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store answered with a non-success status.
    #[error("store returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("invalid store URL: {0}")]
    Url(#[from] url::ParseError),

    /// Document payload could not be decoded.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: Collection, id: String },

    /// Failure injected by [`MemoryStore`].
    #[error("injected failure: {0}")]
    Injected(&'static str),
}

/// Access to the two catalog collections.
///
/// Every call is one independent round trip. Implementations must make a
/// successful write visible to the next read from the same caller.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Documents in `collection` whose `field` equals `value` exactly.
    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>, StoreError>;

    /// Every document in `collection`.
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    /// Insert a new document and return its store-assigned id.
    async fn create(&self, collection: Collection, fields: Fields) -> Result<String, StoreError>;

    /// Overwrite the given fields of an existing document, leaving the others
    /// untouched. Fails with [`StoreError::NotFound`] if the document is missing.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

/// Open the store named in `config`.
///
/// # Errors
///
/// Returns an error if the store client cannot be built.
pub fn connect(config: &StoreConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    match config {
        StoreConfig::Firestore(firestore) => Ok(Arc::new(FirestoreStore::new(firestore)?)),
        StoreConfig::Memory => {
            tracing::warn!("Using in-memory store; catalog changes are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
