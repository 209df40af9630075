//! Bookland API server.
//!
//! Serves the books, authors and publishers catalog over HTTP.

use bookland_rest::{ServerConfig, catalog, create_app_with_config, init_logging};
use clap::Parser;
use tracing::info;

#[cfg(feature = "sqlite")]
use bookland_persistence::backends::sqlite::SqliteBackend;

/// Creates and initializes a SQLite backend from the server configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    info!(database = %config.database_url, "Initializing SQLite backend");

    let backend = if config.is_memory_database() {
        SqliteBackend::in_memory()?
    } else {
        SqliteBackend::open(&config.database_url)?
    };
    backend.init_schema()?;

    Ok(backend)
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        base_url = %config.full_base_url(),
        authentication = config.requires_authentication(),
        "Starting Bookland API server"
    );

    start(config).await
}

#[cfg(feature = "sqlite")]
async fn start(config: ServerConfig) -> anyhow::Result<()> {
    let backend = create_sqlite_backend(&config)?;
    let app = create_app_with_config(backend, catalog::registry(), config.clone());
    serve(app, &config).await
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The server requires the 'sqlite' feature. \
         Build with: cargo build -p bookland-server --features sqlite"
    )
}
