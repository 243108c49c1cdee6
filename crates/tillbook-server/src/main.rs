//! Tillbook server binary.
//!
//! Loads configuration, opens the database pool, makes sure the tables
//! exist, and serves the HTTP API until SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::process::ExitCode;
use thiserror::Error;
use tillbook_server::{app, config, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Failures that stop the server before or while serving.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Pool(#[from] tillbook_db::PoolError),

    #[error("failed to get database connection for schema setup: {0}")]
    Connection(#[from] r2d2::Error),

    #[error(transparent)]
    Schema(#[from] tillbook_db::SchemaError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("TILLBOOK_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is normal outside development.
    let dotenv = dotenvy::dotenv().ok();

    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    let config = match config::load_config(selected_config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tillbook-server: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);

    let file_found = selected_config_path.is_some_and(|p| std::path::Path::new(p).is_file());
    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        file_found,
        dotenv = ?dotenv,
        "resolved startup configuration"
    );
    if !file_found {
        tracing::info!("config file not found, using defaults and environment");
    }

    match run(config).await {
        Ok(()) => {
            tracing::info!("tillbook server shut down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "tillbook server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: config::Config) -> Result<(), StartupError> {
    let pool = tillbook_db::create_pool(
        &config.database.path,
        config.database.runtime_settings(),
    )?;

    {
        let conn = pool.get()?;
        let applied = tillbook_db::ensure_schema(&conn)?;
        if applied > 0 {
            tracing::info!(count = applied, "applied schema steps");
        }
    }

    let state = AppState { pool };
    let app = app(state.clone());
    let addr = SocketAddr::new(config.server.host, config.server.port);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    tracing::info!(%addr, database = %config.database.path, "starting tillbook server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!(
        connections = state.pool.state().connections,
        "closing database pool"
    );
    drop(state);

    Ok(())
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
