//! Core types for the persistence layer.
//!
//! - [`Record`], [`Association`] - stored records and their loaded relations
//! - [`Relation`], [`RelationKind`] - relation definitions for eager loading
//! - [`Scope`] and its parts - the composable query handed to a backend
//!
//! # Building a Scope
//!
//! ```
//! use bookland_persistence::types::{
//!     Comparison, Condition, Ordering, Scope, SortDirection, Window,
//! };
//!
//! let scope = Scope::all("publishers")
//!     .with_condition(Condition::new("name", Comparison::Like, "%Reilly%"))
//!     .with_order(Ordering::new("id", SortDirection::Descending))
//!     .with_window(Window::new(2, 0));
//!
//! assert_eq!(scope.window().map(|w| w.limit), Some(2));
//! ```

mod record;
mod relation;
mod scope;

pub use record::{Association, Record};
pub use relation::{Relation, RelationKind};
pub use scope::{
    Comparison, Condition, Ordering, Scope, ScopeValue, SortDirection, Window, escape_like,
};
