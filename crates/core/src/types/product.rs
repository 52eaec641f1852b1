//! Product records.
//!
//! Two record kinds live in the store: regular catalog [`Product`]s, grouped by
//! category and subcategory, and the curated [`FeaturedProduct`] list shown on
//! the landing page. Each kind has three shapes:
//!
//! - the persisted record, with its store-assigned id and creation timestamp
//! - a `New*` input for inserts (no id, no timestamp)
//! - a `*Patch` for partial updates, where `None` means "leave unchanged"

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::{FeaturedProductId, ProductId};

/// A catalog product as stored in the `products` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Image URL.
    pub image: String,
    pub category: Category,
    /// Free-text grouping within the category.
    pub subcategory: String,
    pub price: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a new product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub image: String,
    pub category: Category,
    pub subcategory: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update for a product. Unset fields are never written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub subcategory: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
}

impl ProductPatch {
    /// Returns `true` if the patch would not change any field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.category.is_none()
            && self.subcategory.is_none()
            && self.price.is_none()
            && self.description.is_none()
    }
}

/// A product in the curated landing-page list (`featured_products`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedProduct {
    pub id: FeaturedProductId,
    pub name: String,
    pub image: String,
    pub category: Category,
    pub price: Option<String>,
    pub description: Option<String>,
    /// Display rank. Not unique, not contiguous; 0 means never ranked.
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a new featured product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeaturedProduct {
    pub name: String,
    pub image: String,
    pub category: Category,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to 0 when not supplied.
    #[serde(default)]
    pub order: Option<i64>,
}

/// Partial update for a featured product. Unset fields are never written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeaturedProductPatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
}

impl FeaturedProductPatch {
    /// A patch that only moves the record to `order`.
    #[must_use]
    pub fn order(order: i64) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch would not change any field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.order.is_none()
    }
}
