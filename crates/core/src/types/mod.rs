//! Core types for the Herrería catalog.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod category;
pub mod id;
pub mod product;

pub use category::{Category, CategoryError};
pub use id::*;
pub use product::{
    FeaturedProduct, FeaturedProductPatch, NewFeaturedProduct, NewProduct, Product, ProductPatch,
};
