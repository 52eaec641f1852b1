//! Integration tests for the Herrería site.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p herreria-integration-tests
//! ```
//!
//! Everything runs against the in-memory record store; no network access is
//! needed.
//!
//! # Test Categories
//!
//! - `catalog_ordering` - Listing order and featured reordering through [`Catalog`]
//! - `site_routes` - HTTP API behaviour, including admin gating
//!
//! [`Catalog`]: herreria_site::catalog::Catalog

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use secrecy::SecretString;

use herreria_core::Category;
use herreria_site::catalog::Catalog;
use herreria_site::config::{AdminConfig, SiteConfig, StoreConfig};
use herreria_site::state::AppState;
use herreria_site::store::{Collection, Fields, MemoryStore};

/// Admin login used by route tests.
pub const ADMIN_USERNAME: &str = "taller";

/// Admin password used by route tests.
pub const ADMIN_PASSWORD: &str = "hierro-forjado-2024";

/// A catalog over a fresh in-memory store, plus the store for inspection.
#[must_use]
pub fn memory_catalog() -> (Catalog, MemoryStore) {
    let store = MemoryStore::new();
    (Catalog::new(Arc::new(store.clone())), store)
}

/// Application state over `store` with a known admin password.
///
/// # Panics
///
/// Panics if the password cannot be hashed.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_state(store: MemoryStore) -> AppState {
    let password_hash =
        herreria_site::services::hash_password(ADMIN_PASSWORD).expect("test password hashes");

    let config = SiteConfig {
        host: [127, 0, 0, 1].into(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        store: StoreConfig::Memory,
        admin: AdminConfig {
            username: ADMIN_USERNAME.to_string(),
            password_hash: SecretString::from(password_hash),
        },
        sentry_dsn: None,
        sentry_environment: None,
    };

    AppState::with_store(config, Arc::new(store))
}

/// A fixed timestamp `minute` minutes into the test day.
///
/// # Panics
///
/// Panics if `minute` is not a valid minute.
#[must_use]
#[allow(clippy::expect_used)]
pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0)
        .single()
        .expect("valid test timestamp")
}

/// Raw `products` document fields.
#[must_use]
pub fn product_fields(
    name: &str,
    category: Category,
    subcategory: &str,
    created: DateTime<Utc>,
) -> Fields {
    let mut fields = Fields::new();
    fields.insert("name".to_string(), name.into());
    fields.insert(
        "image".to_string(),
        format!("https://img.example/{name}.jpg").into(),
    );
    fields.insert("category".to_string(), category.slug().into());
    fields.insert("subcategory".to_string(), subcategory.into());
    fields.insert("createdAt".to_string(), created.into());
    fields
}

/// Raw `featured_products` document fields.
#[must_use]
pub fn featured_fields(name: &str, order: i64, created: DateTime<Utc>) -> Fields {
    let mut fields = Fields::new();
    fields.insert("name".to_string(), name.into());
    fields.insert(
        "image".to_string(),
        format!("https://img.example/{name}.jpg").into(),
    );
    fields.insert("category".to_string(), "portones".into());
    fields.insert("order".to_string(), order.into());
    fields.insert("createdAt".to_string(), created.into());
    fields
}

/// Seed the featured list `A (0)`, `B (1)`, `C (2)`.
pub async fn seed_abc(store: &MemoryStore) {
    for (i, name) in ["A", "B", "C"].into_iter().enumerate() {
        let order = i64::try_from(i).unwrap_or_default();
        store
            .insert(
                Collection::FeaturedProducts,
                name,
                featured_fields(name, order, at(0)),
            )
            .await;
    }
}
