//! SQLite backend implementation.
//!
//! Records of every resource type share one table. Attributes are stored as a
//! JSON document and addressed through `json_extract`, so a resource gains a
//! new attribute without a migration.
//!
//! # Example
//!
//! ```no_run
//! use bookland_persistence::backends::sqlite::SqliteBackend;
//! use bookland_persistence::core::RecordStorage;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//!
//! let publisher = backend
//!     .insert("publishers", json!({"name": "O'Reilly"}))
//!     .await?;
//! assert_eq!(publisher.id(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE records (
//!     resource_type TEXT NOT NULL,
//!     id INTEGER NOT NULL,
//!     data TEXT NOT NULL,  -- JSON attributes
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL,
//!     PRIMARY KEY (resource_type, id)
//! );
//! ```

mod backend;
mod query_builder;
mod schema;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use query_builder::{QueryBuilder, SqlFragment, SqlParam};
