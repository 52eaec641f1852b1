//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::services::AdminAuthenticator;
use crate::store::{self, RecordStore, StoreError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the admin authenticator, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    catalog: Catalog,
    authenticator: AdminAuthenticator,
}

impl AppState {
    /// Create application state, connecting the store named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store client cannot be built.
    pub fn new(config: SiteConfig) -> Result<Self, StoreError> {
        let store = store::connect(&config.store)?;
        Ok(Self::with_store(config, store))
    }

    /// Create application state over an existing store.
    #[must_use]
    pub fn with_store(config: SiteConfig, store: Arc<dyn RecordStore>) -> Self {
        let authenticator = AdminAuthenticator::new(&config.admin);
        Self {
            inner: Arc::new(AppStateInner {
                catalog: Catalog::new(store),
                authenticator,
                config,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the admin authenticator.
    #[must_use]
    pub fn authenticator(&self) -> &AdminAuthenticator {
        &self.inner.authenticator
    }
}
