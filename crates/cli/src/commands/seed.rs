//! Seed the catalog from a YAML file.
//!
//! # File format
//!
//! ```yaml
//! products:
//!   - name: Reja colonial
//!     image: https://img.example/reja.jpg
//!     category: rejas
//!     subcategory: Ventanas
//!     price: "$ 120.000"
//! featured:
//!   - name: Portón corredizo
//!     image: https://img.example/porton.jpg
//!     category: portones
//!     order: 1
//! ```
//!
//! Both lists are optional. Records are always inserted as new documents;
//! running the same file twice adds everything twice.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use herreria_core::{NewFeaturedProduct, NewProduct};

use super::open_catalog;
use crate::error::CliError;

/// Parsed seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedFile {
    pub products: Vec<NewProduct>,
    pub featured: Vec<NewFeaturedProduct>,
}

impl SeedFile {
    /// Parse and validate a seed file.
    fn parse(path: &Path, content: &str) -> Result<Self, CliError> {
        let seed: Self = serde_yaml::from_str(content).map_err(|source| CliError::SeedFormat {
            path: path.to_path_buf(),
            source,
        })?;
        seed.validate()?;
        Ok(seed)
    }

    fn validate(&self) -> Result<(), CliError> {
        for (i, product) in self.products.iter().enumerate() {
            for (field, value) in [
                ("name", &product.name),
                ("image", &product.image),
                ("subcategory", &product.subcategory),
            ] {
                if value.trim().is_empty() {
                    return Err(CliError::InvalidEntry(format!(
                        "products[{i}]: {field} is required"
                    )));
                }
            }
        }
        for (i, product) in self.featured.iter().enumerate() {
            for (field, value) in [("name", &product.name), ("image", &product.image)] {
                if value.trim().is_empty() {
                    return Err(CliError::InvalidEntry(format!(
                        "featured[{i}]: {field} is required"
                    )));
                }
            }
        }
        Ok(())
    }

    const fn len(&self) -> usize {
        self.products.len() + self.featured.len()
    }
}

/// Insert every record in the file at `path`.
///
/// The whole file is validated before anything is written. Each insert is
/// independent, so a failure part way leaves the earlier records in place.
///
/// # Errors
///
/// Returns an error if the file is unreadable or invalid, or if any insert
/// fails.
pub async fn from_file(path: &Path) -> Result<(), CliError> {
    let content = tokio::fs::read_to_string(path).await?;
    let seed = SeedFile::parse(path, &content)?;
    info!(
        path = %path.display(),
        products = seed.products.len(),
        featured = seed.featured.len(),
        "Parsed seed file"
    );

    let catalog = open_catalog()?;
    let total = seed.len();
    let mut failed = 0;

    for product in seed.products {
        let name = product.name.clone();
        match catalog.add(product).await {
            Some(id) => info!(id = %id, name = %name, "Added product"),
            None => {
                warn!(name = %name, "Product not added");
                failed += 1;
            }
        }
    }

    for product in seed.featured {
        let name = product.name.clone();
        match catalog.add_featured(product).await {
            Some(id) => info!(id = %id, name = %name, "Added featured product"),
            None => {
                warn!(name = %name, "Featured product not added");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::PartialSeed { failed, total });
    }

    info!(total, "Seeding complete");
    Ok(())
}
