//! CLI command implementations.

pub mod catalog;
pub mod password;
pub mod seed;

use herreria_site::catalog::Catalog;
use herreria_site::config::StoreConfig;
use herreria_site::store;

use crate::error::CliError;

/// Open the catalog using the store settings from the environment.
fn open_catalog() -> Result<Catalog, CliError> {
    let config = StoreConfig::from_env()?;
    let store = store::connect(&config)?;
    Ok(Catalog::new(store))
}
