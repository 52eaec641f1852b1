//! Herrería Core - Catalog types and ordering policy.
//!
//! This crate provides the domain types shared by the site and the CLI:
//! - `site` - Public catalog site and admin API
//! - `cli` - Operator tooling (password hashing, listing, seeding)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no store
//! access, no HTTP clients. Everything the record store returns is decoded into
//! these types before the rest of the workspace sees it.
//!
//! # Modules
//!
//! - [`types`] - Document ids, categories, and product records
//! - [`ordering`] - Display-order comparators and the featured reorder transition

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ordering;
pub mod types;

pub use ordering::{Direction, OrderSwap};
pub use types::*;
