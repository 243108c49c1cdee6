//! Database layer for Tillbook.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! and the embedded schema bootstrap that creates the `products` and
//! `services` tables on first start.
//!
//! A request never shares its connection: handlers check one out of the
//! pool, run a single store operation, and the `PooledConnection` guard
//! returns it when dropped, whichever way the handler exits.

mod pool;
mod schema;

pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
pub use schema::{ensure_schema, SchemaError};
