//! Connection pool creation and configuration.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for SQLite connections, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

/// The SQLite connection pool shared by all request handlers.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Errors that can occur when creating the database pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Failed to build the connection pool.
    #[error("failed to create database connection pool: {0}")]
    PoolInit(#[from] r2d2::Error),

    /// A pool must be allowed at least one connection.
    #[error("database pool size must be at least 1")]
    EmptyPool,
}

/// SQLite's name for a private in-memory database.
const IN_MEMORY_PATH: &str = ":memory:";

/// Number of connections the pool may hold for `db_path`.
///
/// Each connection to `:memory:` opens its own empty database, so an
/// in-memory pool is pinned to one connection that every request shares in
/// turn; otherwise tables created at startup would be missing on the rest.
fn effective_max_size(db_path: &str, settings: DbRuntimeSettings) -> Result<u32, PoolError> {
    if settings.pool_max_size == 0 {
        return Err(PoolError::EmptyPool);
    }
    if db_path == IN_MEMORY_PATH {
        return Ok(1);
    }
    Ok(settings.pool_max_size)
}

/// Creates a new SQLite connection pool with WAL mode and foreign keys enabled.
///
/// # Arguments
///
/// * `db_path` - Path to the SQLite database file. `:memory:` is accepted
///   and yields a single-connection pool over one in-memory database.
///
/// # Errors
///
/// Returns `PoolError::EmptyPool` if `settings.pool_max_size` is zero, or
/// `PoolError::PoolInit` if the connection pool cannot be created.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let max_size = effective_max_size(db_path, settings)?;

    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let manager = SqliteConnectionManager::file(db_path)
        .with_flags(flags)
        .with_init(move |conn| {
            // In-memory databases report "memory", which is acceptable.
            let journal_mode: String =
                conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
            if journal_mode != "wal" && journal_mode != "memory" {
                return Err(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                    Some(format!(
                        "failed to set WAL journal mode, got: {}",
                        journal_mode
                    )),
                ));
            }
            conn.execute_batch(&format!(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = {};",
                settings.busy_timeout_ms
            ))
        });

    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)?;

    tracing::debug!(
        path = db_path,
        max_size,
        busy_timeout_ms = settings.busy_timeout_ms,
        "database pool ready"
    );

    Ok(pool)
}
