//! Catalog data access.
//!
//! [`Catalog`] is the only thing in the site that talks to the record store.
//! It translates typed intents into store calls and store documents back into
//! domain records.
//!
//! # Failure contract
//!
//! Nothing here returns an error for expected store failures:
//!
//! - Reads log the failure and return an empty list. "No data" and "query
//!   failed" look the same to the caller.
//! - Writes log the failure and return a sentinel: `None` for inserts,
//!   `false` for updates and deletes.
//!
//! No operation retries, and the catalog keeps no state between calls. A
//! successful write is visible to the next read, so callers re-read after
//! mutating instead of patching their own copy.

pub mod schema;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use herreria_core::ordering::{self, Direction};
use herreria_core::{
    Category, FeaturedProduct, FeaturedProductId, FeaturedProductPatch, NewFeaturedProduct,
    NewProduct, Product, ProductId, ProductPatch,
};

use crate::store::{Collection, FieldValue, RecordStore, StoreError};

/// Result of moving a featured product one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Nothing was written: the record was not displayed, or was already at
    /// the edge of the list.
    Unchanged,
    /// Both records took each other's `order`.
    Swapped,
    /// At least one of the two writes failed. Nothing is rolled back, so the
    /// two records may now share an `order` value.
    Incomplete {
        record_written: bool,
        neighbour_written: bool,
    },
}

/// Typed access to the `products` and `featured_products` collections.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn RecordStore>,
}

impl Catalog {
    /// Create a catalog over a record store.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Check that the store answers a read.
    ///
    /// This is the one operation that surfaces the store error, for readiness
    /// probes.
    ///
    /// # Errors
    ///
    /// Returns the underlying `StoreError`.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.list(Collection::FeaturedProducts).await.map(|_| ())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Products in `category`, newest first.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn list_by_category(&self, category: Category) -> Vec<Product> {
        let documents = match self
            .store
            .query_eq(
                Collection::Products,
                schema::field::CATEGORY,
                &FieldValue::from(category.slug()),
            )
            .await
        {
            Ok(documents) => documents,
            Err(e) => {
                error!(error = %e, "Failed to list products");
                return Vec::new();
            }
        };

        let now = Utc::now();
        let mut products: Vec<Product> = documents
            .into_iter()
            .filter_map(|document| {
                let id = document.id.clone();
                schema::decode_product(document, now)
                    .inspect_err(|e| warn!(id = %id, error = %e, "Skipping malformed product"))
                    .ok()
            })
            .filter(|product| product.category == category)
            .collect();

        ordering::sort_newest_first(&mut products);
        debug!(count = products.len(), "Listed products");
        products
    }

    /// Insert a product, stamping its creation time. Returns the new id.
    #[instrument(skip(self, product), fields(category = %product.category))]
    pub async fn add(&self, product: NewProduct) -> Option<ProductId> {
        let fields = schema::encode_new_product(product, Utc::now());
        match self.store.create(Collection::Products, fields).await {
            Ok(id) => {
                info!(id = %id, "Product added");
                Some(ProductId::new(id))
            }
            Err(e) => {
                error!(error = %e, "Failed to add product");
                None
            }
        }
    }

    /// Write the fields set in `patch`. Returns whether the write succeeded.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update(&self, id: &ProductId, patch: ProductPatch) -> bool {
        if patch.is_empty() {
            debug!("Empty product patch, nothing to write");
            return true;
        }

        let fields = schema::encode_product_patch(patch);
        match self
            .store
            .update(Collection::Products, id.as_str(), fields)
            .await
        {
            Ok(()) => {
                info!("Product updated");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to update product");
                false
            }
        }
    }

    /// Delete a product. Returns whether the delete succeeded.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove(&self, id: &ProductId) -> bool {
        match self.store.delete(Collection::Products, id.as_str()).await {
            Ok(()) => {
                info!("Product deleted");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to delete product");
                false
            }
        }
    }

    /// Distinct subcategories of `category`, in the order they first appear
    /// in [`Catalog::list_by_category`].
    pub async fn list_subcategories(&self, category: Category) -> Vec<String> {
        ordering::distinct_subcategories(&self.list_by_category(category).await)
    }

    // =========================================================================
    // Featured products
    // =========================================================================

    /// The featured list in display order.
    #[instrument(skip(self))]
    pub async fn list_featured(&self) -> Vec<FeaturedProduct> {
        let documents = match self.store.list(Collection::FeaturedProducts).await {
            Ok(documents) => documents,
            Err(e) => {
                error!(error = %e, "Failed to list featured products");
                return Vec::new();
            }
        };

        let now = Utc::now();
        let mut products: Vec<FeaturedProduct> = documents
            .into_iter()
            .filter_map(|document| {
                let id = document.id.clone();
                schema::decode_featured(document, now)
                    .inspect_err(|e| {
                        warn!(id = %id, error = %e, "Skipping malformed featured product");
                    })
                    .ok()
            })
            .collect();

        ordering::sort_featured(&mut products);
        debug!(count = products.len(), "Listed featured products");
        products
    }

    /// Insert a featured product. `order` defaults to 0.
    #[instrument(skip(self, product))]
    pub async fn add_featured(&self, product: NewFeaturedProduct) -> Option<FeaturedProductId> {
        let fields = schema::encode_new_featured(product, Utc::now());
        match self.store.create(Collection::FeaturedProducts, fields).await {
            Ok(id) => {
                info!(id = %id, "Featured product added");
                Some(FeaturedProductId::new(id))
            }
            Err(e) => {
                error!(error = %e, "Failed to add featured product");
                None
            }
        }
    }

    /// Write the fields set in `patch`. Returns whether the write succeeded.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update_featured(&self, id: &FeaturedProductId, patch: FeaturedProductPatch) -> bool {
        if patch.is_empty() {
            debug!("Empty featured patch, nothing to write");
            return true;
        }

        let fields = schema::encode_featured_patch(patch);
        match self
            .store
            .update(Collection::FeaturedProducts, id.as_str(), fields)
            .await
        {
            Ok(()) => {
                info!("Featured product updated");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to update featured product");
                false
            }
        }
    }

    /// Delete a featured product. Returns whether the delete succeeded.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove_featured(&self, id: &FeaturedProductId) -> bool {
        match self
            .store
            .delete(Collection::FeaturedProducts, id.as_str())
            .await
        {
            Ok(()) => {
                info!("Featured product deleted");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to delete featured product");
                false
            }
        }
    }

    /// Move a featured product one step within `displayed`, the list as the
    /// caller currently shows it.
    ///
    /// Swaps the ranks of the record and its neighbour with two sequential
    /// updates (see [`ordering::plan_move`] for unset and shared ranks). The second update is issued even if the first one
    /// fails and neither is rolled back. Callers must re-read the list to see
    /// the result.
    #[instrument(skip(self, displayed), fields(id = %id, direction = %direction))]
    pub async fn move_featured(
        &self,
        displayed: &[FeaturedProduct],
        id: &FeaturedProductId,
        direction: Direction,
    ) -> MoveOutcome {
        let Some(swap) = ordering::plan_move(displayed, id, direction) else {
            debug!("Featured product not movable, no writes issued");
            return MoveOutcome::Unchanged;
        };

        let record_written = self
            .update_featured(&swap.record, FeaturedProductPatch::order(swap.record_order))
            .await;
        let neighbour_written = self
            .update_featured(
                &swap.neighbour,
                FeaturedProductPatch::order(swap.neighbour_order),
            )
            .await;

        if record_written && neighbour_written {
            info!(neighbour = %swap.neighbour, "Featured products swapped");
            MoveOutcome::Swapped
        } else {
            warn!(
                neighbour = %swap.neighbour,
                record_written,
                neighbour_written,
                "Featured reorder only partially applied"
            );
            MoveOutcome::Incomplete {
                record_written,
                neighbour_written,
            }
        }
    }
}
