//! SQLite backend: connection pool and pragmas.

use std::fmt::Debug;
use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, StorageError, StorageResult};

use super::schema;

/// Name reported in backend errors and by `RecordStorage::backend_name`.
pub(super) const BACKEND_NAME: &str = "sqlite";

const MEMORY_PATH: &str = ":memory:";

pub(super) type Connection = PooledConnection<SqliteConnectionManager>;

/// SQLite backend for record storage.
///
/// Cloning is not supported; share it behind an `Arc` (the REST state does).
pub struct SqliteBackend {
    pool: Pool<SqliteConnectionManager>,
    is_memory: bool,
}

impl Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("is_memory", &self.is_memory)
            .field("pool_size", &self.pool.max_size())
            .finish_non_exhaustive()
    }
}

/// Pool and pragma settings for [`SqliteBackend`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteBackendConfig {
    /// Pool size for file databases. In-memory databases always get one
    /// connection so every caller sees the same database.
    pub max_connections: u32,

    /// How long to wait for a pooled connection, in milliseconds.
    pub connection_timeout_ms: u64,

    /// `busy_timeout` pragma, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Switch file databases to WAL journaling.
    pub enable_wal: bool,
}

impl Default for SqliteBackendConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connection_timeout_ms: 30_000,
            busy_timeout_ms: 5_000,
            enable_wal: true,
        }
    }
}

fn connection_failed(e: impl std::fmt::Display) -> StorageError {
    StorageError::Backend(BackendError::ConnectionFailed {
        backend_name: BACKEND_NAME.to_string(),
        message: e.to_string(),
    })
}


impl SqliteBackend {
    /// Creates a private in-memory database.
    pub fn in_memory() -> StorageResult<Self> {
        Self::with_config(MEMORY_PATH, SqliteBackendConfig::default())
    }

    /// Opens or creates a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::with_config(path, SqliteBackendConfig::default())
    }

    /// Opens `path` (or `:memory:`) with explicit settings.
    pub fn with_config<P: AsRef<Path>>(
        path: P,
        config: SqliteBackendConfig,
    ) -> StorageResult<Self> {
        let path = path.as_ref();
        let is_memory = path.as_os_str() == MEMORY_PATH;

        let (manager, pool_size) = if is_memory {
            (SqliteConnectionManager::memory(), 1)
        } else {
            (
                SqliteConnectionManager::file(path),
                config.max_connections.max(1),
            )
        };

        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let wal = config.enable_wal && !is_memory;
        let manager = manager.with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            if wal {
                // journal_mode answers with a row
                conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
            }
            Ok(())
        });

        let mut builder = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(Duration::from_millis(config.connection_timeout_ms));
        if is_memory {
            // Replacing the only connection would open a new, empty database
            builder = builder.max_lifetime(None).idle_timeout(None);
        }
        let pool = builder.build(manager).map_err(connection_failed)?;

        tracing::debug!(
            path = %path.display(),
            is_memory,
            pool_size,
            "Opened SQLite backend"
        );

        Ok(Self { pool, is_memory })
    }

    /// Creates the records table and indexes if they do not exist yet.
    pub fn init_schema(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        schema::initialize_schema(&conn)
    }

    /// Checks out a pooled connection.
    pub(crate) fn get_connection(&self) -> StorageResult<Connection> {
        self.pool.get().map_err(connection_failed)
    }

    /// Returns whether this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        self.is_memory
    }

    /// Round-trips a trivial query through a pooled connection.
    pub fn ping(&self) -> StorageResult<()> {
        self.get_connection()?
            .query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| {
                StorageError::Backend(BackendError::Unavailable {
                    backend_name: BACKEND_NAME.to_string(),
                    message: e.to_string(),
                })
            })
    }
}
