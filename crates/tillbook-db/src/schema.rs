//! Embedded schema bootstrap.
//!
//! Schema steps are SQL files embedded at compile time. They run in order on
//! startup, tracked by the `_tillbook_schema` table, so each step runs at
//! most once per database. The table definitions themselves use
//! `IF NOT EXISTS`, which keeps a database created by an older deployment
//! usable as-is.

use rusqlite::Connection;
use thiserror::Error;

/// A single embedded schema step.
struct SchemaStep {
    name: &'static str,
    sql: &'static str,
}

/// All schema steps in order. New steps are appended here.
const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        name: "000_products",
        sql: include_str!("schema/000_products.sql"),
    },
    SchemaStep {
        name: "001_services",
        sql: include_str!("schema/001_services.sql"),
    },
];

/// Errors that can occur while bringing the schema up to date.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A SQL statement within a schema step failed.
    #[error("schema step '{name}' failed: {source}")]
    ExecutionFailed {
        /// The name of the step that failed.
        name: String,
        /// The underlying SQLite error.
        source: rusqlite::Error,
    },

    /// Failed to query which steps have been applied.
    #[error("failed to check schema state: {0}")]
    StateQuery(rusqlite::Error),
}

/// Creates the `products` and `services` tables if they are missing.
///
/// Returns the number of steps applied by this call; `0` means the schema
/// was already current.
///
/// # Errors
///
/// Returns `SchemaError` if any step fails to execute or if the tracking
/// table cannot be queried. A failed step is rolled back in full.
pub fn ensure_schema(conn: &Connection) -> Result<usize, SchemaError> {
    apply_steps(conn, SCHEMA_STEPS)
}

fn apply_steps(conn: &Connection, steps: &[SchemaStep]) -> Result<usize, SchemaError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _tillbook_schema (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| SchemaError::ExecutionFailed {
        name: "_tillbook_schema_bootstrap".to_string(),
        source: e,
    })?;

    let mut applied = 0;

    for step in steps {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _tillbook_schema WHERE name = ?1",
                [step.name],
                |row| row.get(0),
            )
            .map_err(SchemaError::StateQuery)?;

        if already_applied {
            tracing::debug!(step = step.name, "schema step already applied, skipping");
            continue;
        }

        tracing::info!(step = step.name, "applying schema step");

        let failed = |e| SchemaError::ExecutionFailed {
            name: step.name.to_string(),
            source: e,
        };

        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(step.sql).map_err(failed)?;
        tx.execute("INSERT INTO _tillbook_schema (name) VALUES (?1)", [step.name])
            .map_err(failed)?;
        tx.commit().map_err(failed)?;

        applied += 1;
    }

    Ok(applied)
}
