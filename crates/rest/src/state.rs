//! Application state for the Bookland API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the storage backend, the schema registry and the server
//! configuration. Everything in it is read-only after startup.

use std::sync::Arc;

use bookland_persistence::core::RecordStorage;

use crate::config::ServerConfig;
use crate::orchestrator::Orchestrator;
use crate::query::Paginator;
use crate::schema::{ResourceSchema, SchemaRegistry};

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`RecordStorage`])
///
/// # Example
///
/// ```rust,ignore
/// use bookland_rest::{AppState, ServerConfig, catalog};
/// use bookland_persistence::backends::sqlite::SqliteBackend;
/// use std::sync::Arc;
///
/// let backend = SqliteBackend::in_memory()?;
/// let state = AppState::new(Arc::new(backend), catalog::registry(), ServerConfig::default());
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Presentation metadata for every exposed resource.
    registry: Arc<SchemaRegistry>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: RecordStorage> AppState<S> {
    /// Creates a new AppState.
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backend (wrapped in Arc)
    /// * `registry` - The exposed resources
    /// * `config` - Server configuration
    pub fn new(storage: Arc<S>, registry: SchemaRegistry, config: ServerConfig) -> Self {
        Self {
            storage,
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the schema registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Looks up the schema of an exposed resource.
    pub fn schema(&self, resource: &str) -> Option<Arc<ResourceSchema>> {
        self.registry.get(resource)
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the base URL for the server.
    pub fn base_url(&self) -> &str {
        self.config.full_base_url()
    }

    /// Returns the paginator configured with the page size limits.
    pub fn paginator(&self) -> Paginator {
        Paginator::new(self.config.default_page_size, self.config.max_page_size)
    }

    /// Returns an orchestrator borrowing this state.
    pub fn orchestrator(&self) -> Orchestrator<'_, S> {
        Orchestrator::new(self.storage.as_ref(), self.registry.as_ref(), self.paginator())
    }
}
