//! Document schema for the two catalog collections.
//!
//! Store documents are untyped field maps. Everything read from the store goes
//! through [`decode_product`] or [`decode_featured`], which apply the defaulting
//! rules in one place:
//!
//! - missing or non-timestamp `createdAt` becomes the read time
//! - missing or non-numeric `order` becomes 0; doubles are truncated
//! - `price` and `description` are optional; `null` counts as absent
//!
//! Required string fields and the category are strict: a document that lacks
//! them is rejected rather than guessed at.

use chrono::{DateTime, Utc};
use thiserror::Error;

use herreria_core::{
    Category, FeaturedProduct, FeaturedProductId, FeaturedProductPatch, NewFeaturedProduct,
    NewProduct, Product, ProductId, ProductPatch,
};

use crate::store::{Document, FieldValue, Fields};

/// Document field names.
pub mod field {
    pub const NAME: &str = "name";
    pub const IMAGE: &str = "image";
    pub const CATEGORY: &str = "category";
    pub const SUBCATEGORY: &str = "subcategory";
    pub const PRICE: &str = "price";
    pub const DESCRIPTION: &str = "description";
    pub const CREATED_AT: &str = "createdAt";
    pub const ORDER: &str = "order";
}

/// Why a document could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown category `{0}`")]
    UnknownCategory(String),
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a `products` document. `now` backfills a missing `createdAt`.
///
/// # Errors
///
/// Returns `SchemaError` if a required field is missing or mistyped.
pub fn decode_product(document: Document, now: DateTime<Utc>) -> Result<Product, SchemaError> {
    let mut fields = document.fields;
    Ok(Product {
        id: ProductId::new(document.id),
        name: required_string(&mut fields, field::NAME)?,
        image: required_string(&mut fields, field::IMAGE)?,
        category: category(&mut fields)?,
        subcategory: required_string(&mut fields, field::SUBCATEGORY)?,
        price: optional_string(&mut fields, field::PRICE)?,
        description: optional_string(&mut fields, field::DESCRIPTION)?,
        created_at: created_at(&mut fields, now),
    })
}

/// Decode a `featured_products` document. `now` backfills a missing `createdAt`.
///
/// # Errors
///
/// Returns `SchemaError` if a required field is missing or mistyped.
pub fn decode_featured(
    document: Document,
    now: DateTime<Utc>,
) -> Result<FeaturedProduct, SchemaError> {
    let mut fields = document.fields;
    Ok(FeaturedProduct {
        id: FeaturedProductId::new(document.id),
        name: required_string(&mut fields, field::NAME)?,
        image: required_string(&mut fields, field::IMAGE)?,
        category: category(&mut fields)?,
        price: optional_string(&mut fields, field::PRICE)?,
        description: optional_string(&mut fields, field::DESCRIPTION)?,
        order: order(&mut fields),
        created_at: created_at(&mut fields, now),
    })
}

fn required_string(fields: &mut Fields, name: &'static str) -> Result<String, SchemaError> {
    match fields.remove(name) {
        Some(FieldValue::String(value)) => Ok(value),
        None | Some(FieldValue::Null) => Err(SchemaError::MissingField(name)),
        Some(_) => Err(SchemaError::WrongType {
            field: name,
            expected: "string",
        }),
    }
}

fn optional_string(fields: &mut Fields, name: &'static str) -> Result<Option<String>, SchemaError> {
    match fields.remove(name) {
        Some(FieldValue::String(value)) => Ok(Some(value)),
        None | Some(FieldValue::Null) => Ok(None),
        Some(_) => Err(SchemaError::WrongType {
            field: name,
            expected: "string",
        }),
    }
}

fn category(fields: &mut Fields) -> Result<Category, SchemaError> {
    let slug = required_string(fields, field::CATEGORY)?;
    slug.parse()
        .map_err(|_| SchemaError::UnknownCategory(slug))
}

fn created_at(fields: &mut Fields, now: DateTime<Utc>) -> DateTime<Utc> {
    match fields.remove(field::CREATED_AT) {
        Some(FieldValue::Timestamp(at)) => at,
        _ => now,
    }
}

#[allow(clippy::cast_possible_truncation)] // saturating float-to-int cast is the intent
fn order(fields: &mut Fields) -> i64 {
    match fields.remove(field::ORDER) {
        Some(FieldValue::Integer(order)) => order,
        Some(FieldValue::Double(order)) if order.is_finite() => order as i64,
        _ => 0,
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Fields for a new `products` document.
#[must_use]
pub fn encode_new_product(product: NewProduct, created_at: DateTime<Utc>) -> Fields {
    let mut fields = Fields::new();
    fields.insert(field::NAME.to_owned(), product.name.into());
    fields.insert(field::IMAGE.to_owned(), product.image.into());
    fields.insert(field::CATEGORY.to_owned(), product.category.slug().into());
    fields.insert(field::SUBCATEGORY.to_owned(), product.subcategory.into());
    insert_some(&mut fields, field::PRICE, product.price);
    insert_some(&mut fields, field::DESCRIPTION, product.description);
    fields.insert(field::CREATED_AT.to_owned(), created_at.into());
    fields
}

/// Fields for a new `featured_products` document. `order` defaults to 0.
#[must_use]
pub fn encode_new_featured(product: NewFeaturedProduct, created_at: DateTime<Utc>) -> Fields {
    let mut fields = Fields::new();
    fields.insert(field::NAME.to_owned(), product.name.into());
    fields.insert(field::IMAGE.to_owned(), product.image.into());
    fields.insert(field::CATEGORY.to_owned(), product.category.slug().into());
    insert_some(&mut fields, field::PRICE, product.price);
    insert_some(&mut fields, field::DESCRIPTION, product.description);
    fields.insert(
        field::ORDER.to_owned(),
        product.order.unwrap_or_default().into(),
    );
    fields.insert(field::CREATED_AT.to_owned(), created_at.into());
    fields
}

/// Fields written by a product update. Unset patch fields are left out.
#[must_use]
pub fn encode_product_patch(patch: ProductPatch) -> Fields {
    let mut fields = Fields::new();
    insert_some(&mut fields, field::NAME, patch.name);
    insert_some(&mut fields, field::IMAGE, patch.image);
    insert_some(
        &mut fields,
        field::CATEGORY,
        patch.category.map(|c| c.slug().to_owned()),
    );
    insert_some(&mut fields, field::SUBCATEGORY, patch.subcategory);
    insert_some(&mut fields, field::PRICE, patch.price);
    insert_some(&mut fields, field::DESCRIPTION, patch.description);
    fields
}

/// Fields written by a featured product update. Unset patch fields are left out.
#[must_use]
pub fn encode_featured_patch(patch: FeaturedProductPatch) -> Fields {
    let mut fields = Fields::new();
    insert_some(&mut fields, field::NAME, patch.name);
    insert_some(&mut fields, field::IMAGE, patch.image);
    insert_some(
        &mut fields,
        field::CATEGORY,
        patch.category.map(|c| c.slug().to_owned()),
    );
    insert_some(&mut fields, field::PRICE, patch.price);
    insert_some(&mut fields, field::DESCRIPTION, patch.description);
    if let Some(order) = patch.order {
        fields.insert(field::ORDER.to_owned(), order.into());
    }
    fields
}

fn insert_some(fields: &mut Fields, name: &str, value: Option<String>) {
    if let Some(value) = value {
        fields.insert(name.to_owned(), value.into());
    }
}
