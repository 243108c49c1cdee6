//! Product and service stores for Tillbook.
//!
//! Each store is a pair of plain functions over a borrowed
//! [`rusqlite::Connection`]: `create_*` inserts a record and returns it as
//! persisted (store-assigned `id` included), `list_*` returns a skip/limit
//! window ordered by `id`. The stores never open or pool connections
//! themselves; the caller owns the session for the duration of one call.

mod products;
mod services;

use thiserror::Error;

pub use products::{create_product, list_products};
pub use services::{create_service, list_services};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
