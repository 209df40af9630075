//! Bookland persistence layer.
//!
//! This crate stores catalog records (books, authors, publishers) and answers
//! the narrow set of queries the JSON API needs: filtered, ordered, windowed
//! listings with batched loading of related records.
//!
//! # Architecture
//!
//! - [`types`] - Records, relations and the [`Scope`](types::Scope) query builder
//! - [`error`] - Error types for all operations
//! - [`core`] - The [`RecordStorage`](core::RecordStorage) trait
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```
//! use bookland_persistence::types::{
//!     Comparison, Condition, Ordering, Relation, Scope, SortDirection, Window,
//! };
//!
//! let scope = Scope::all("books")
//!     .with_condition(Condition::new("title", Comparison::Like, "%Rust%"))
//!     .with_order(Ordering::new("title", SortDirection::Ascending))
//!     .with_window(Window::new(10, 0))
//!     .with_eager_load(Relation::belongs_to("publisher", "publishers", "publisher_id"));
//!
//! assert_eq!(scope.resource_type(), "books");
//! assert_eq!(scope.conditions().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use core::RecordStorage;
pub use error::{StorageError, StorageResult};
pub use types::{Record, Scope};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
