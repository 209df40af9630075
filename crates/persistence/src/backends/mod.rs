//! Database backend implementations.
//!
//! Each backend implements [`RecordStorage`](crate::core::RecordStorage) and is
//! gated behind a feature flag.
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | SQLite | `sqlite` | Embedded database with in-memory and file modes |

#[cfg(feature = "sqlite")]
pub mod sqlite;
