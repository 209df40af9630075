//! # bookland-rest - Bookland JSON API
//!
//! This crate serves the Bookland catalog (books, authors, publishers) as a
//! resource-oriented JSON API. Every listing runs through one metadata-driven
//! pipeline: clients filter, sort, paginate, pick fields and embed related
//! resources through query-string conventions, validated against a
//! per-resource [`ResourceSchema`](schema::ResourceSchema).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bookland_rest::{catalog, create_app_with_config, ServerConfig};
//! use bookland_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::open("bookland.db")?;
//!     backend.init_schema()?;
//!
//!     let app = create_app_with_config(backend, catalog::registry(), ServerConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | index | GET | `/api/[resource]` |
//! | show | GET | `/api/[resource]/[id]` |
//! | health | GET | `/health` |
//! | readiness | GET | `/_readiness` |
//!
//! ## Query Parameters
//!
//! | Parameter | Format | Effect |
//! |-----------|--------|--------|
//! | `q[<column>_<predicate>]` | string | Filter (`eq`, `cont`, `notcont`, `start`, `end`, `gt`, `lt`) |
//! | `sort` | string | Sort column (default: primary key) |
//! | `dir` | `asc` or `desc` | Sort direction (default: `desc`) |
//! | `page` | positive integer | Page number (default 1) |
//! | `per` | positive integer | Page size (default 10) |
//! | `fields` | comma-separated | Rendered attributes, in the given order |
//! | `embed` | comma-separated | Related resources to nest |
//!
//! ## Error Handling
//!
//! | HTTP Status | Body | Description |
//! |-------------|------|-------------|
//! | 400 | `{"error":{"invalid_params":"sort=fid; page=fake"}}` | Invalid parameters |
//! | 401 | empty | Missing or unknown API key |
//! | 404 | empty | Unknown resource or record |
//! | 500 | `{"error":{"message":...}}` | Storage failure |
//!
//! ## Architecture
//!
//! - [`schema`] / [`catalog`] - Resource metadata
//! - [`query`] - Filter, Sorter, Paginator, EagerLoader
//! - [`presentation`] - Presenter, FieldPicker, EmbedPicker
//! - [`orchestrator`] - The validate, query, render pipeline
//! - [`handlers`] / [`routing`] / [`middleware`] / [`extractors`] / [`responses`] - HTTP surface
//! - [`config`] / [`state`] / [`error`] - Ambient plumbing

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod orchestrator;
pub mod presentation;
pub mod query;
pub mod responses;
pub mod routing;
pub mod schema;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{InvalidParam, RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use bookland_persistence::core::RecordStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::schema::SchemaRegistry;

/// Creates the Axum application serving the bundled catalog with default
/// configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    create_app_with_config(storage, catalog::registry(), ServerConfig::default())
}

/// Creates the Axum application with custom resources and configuration.
///
/// # Arguments
///
/// * `storage` - The storage backend to use
/// * `registry` - The resources to expose
/// * `config` - Server configuration
///
/// # Example
///
/// ```rust,ignore
/// use bookland_rest::{catalog, create_app_with_config, ServerConfig};
/// use bookland_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// let config = ServerConfig {
///     port: 3000,
///     api_keys: "secret".to_string(),
///     ..Default::default()
/// };
/// let app = create_app_with_config(backend, catalog::registry(), config);
/// ```
pub fn create_app_with_config<S>(storage: S, registry: SchemaRegistry, config: ServerConfig) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    info!(
        backend = storage.backend_name(),
        resources = ?registry.names(),
        authentication = config.requires_authentication(),
        "Creating REST API server"
    );

    // Create application state
    let state = AppState::new(Arc::new(storage), registry, config.clone());

    // Build the router with all routes
    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bookland_rest={level},bookland_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
