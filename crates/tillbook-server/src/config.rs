//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
///
/// `path` has no default. Startup refuses to continue until it is set
/// through the config file, `TILLBOOK_DB_PATH`, or `DATABASE_URL`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default)]
    pub path: String,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tillbook_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl DatabaseConfig {
    /// Pool settings derived from this configuration.
    pub fn runtime_settings(&self) -> tillbook_db::DbRuntimeSettings {
        tillbook_db::DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// `DATABASE_URL` names a database other than SQLite.
    #[error("unsupported database url scheme '{0}', expected sqlite")]
    UnsupportedDatabaseUrl(String),

    /// The pool would have no connections to hand out.
    #[error("database.pool_max_size must be at least 1")]
    InvalidPoolSize,

    /// No database location was configured anywhere.
    #[error(
        "no database configured: set database.path, TILLBOOK_DB_PATH, or DATABASE_URL"
    )]
    MissingDatabasePath,
}

/// Loads configuration from a TOML file, then applies environment overrides.
///
/// Environment variable overrides:
/// - `TILLBOOK_HOST` overrides `server.host`
/// - `TILLBOOK_PORT` overrides `server.port`
/// - `DATABASE_URL` overrides `database.path` (bare path or `sqlite://` URL)
/// - `TILLBOOK_DB_PATH` overrides `database.path`, winning over `DATABASE_URL`
/// - `TILLBOOK_DB_BUSY_TIMEOUT_MS` overrides `database.busy_timeout_ms`
/// - `TILLBOOK_DB_POOL_MAX_SIZE` overrides `database.pool_max_size`
/// - `TILLBOOK_LOG_LEVEL` overrides `logging.level`
/// - `TILLBOOK_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// A missing file is not an error; the defaults apply. Returns `ConfigError`
/// if the file exists but cannot be read or parsed, if no database path is
/// configured after all layers are applied, or if the pool size is zero.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

fn load_config_with<F>(path: Option<&str>, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, env)?;

    if config.database.path.trim().is_empty() {
        return Err(ConfigError::MissingDatabasePath);
    }
    if config.database.pool_max_size == 0 {
        return Err(ConfigError::InvalidPoolSize);
    }

    Ok(config)
}

fn apply_env_overrides<F>(config: &mut Config, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = env("TILLBOOK_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = env("TILLBOOK_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(url) = env("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
        config.database.path = sqlite_path_from_url(&url)?;
    }
    if let Some(db_path) = env("TILLBOOK_DB_PATH").filter(|v| !v.trim().is_empty()) {
        config.database.path = db_path;
    }
    if let Some(timeout) = env("TILLBOOK_DB_BUSY_TIMEOUT_MS") {
        if let Ok(parsed) = timeout.parse() {
            config.database.busy_timeout_ms = parsed;
        }
    }
    if let Some(size) = env("TILLBOOK_DB_POOL_MAX_SIZE") {
        if let Ok(parsed) = size.parse() {
            config.database.pool_max_size = parsed;
        }
    }
    if let Some(level) = env("TILLBOOK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = env("TILLBOOK_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(())
}

/// Extracts a filesystem path from a `DATABASE_URL` value.
///
/// Accepts `sqlite:///abs/path.db`, `sqlite://rel.db`, `sqlite:rel.db`, or a
/// bare path. Any other scheme is rejected.
fn sqlite_path_from_url(url: &str) -> Result<String, ConfigError> {
    let url = url.trim();
    if let Some(rest) = url.strip_prefix("sqlite://") {
        return Ok(rest.to_string());
    }
    if let Some(rest) = url.strip_prefix("sqlite:") {
        return Ok(rest.to_string());
    }
    if let Some((scheme, _)) = url.split_once("://") {
        return Err(ConfigError::UnsupportedDatabaseUrl(scheme.to_string()));
    }
    Ok(url.to_string())
}
