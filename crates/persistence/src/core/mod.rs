//! Core storage traits.
//!
//! - [`RecordStorage`] - insert, find, scope execution
//!
//! Backends live in [`crate::backends`]; the REST layer only ever talks to
//! this trait.

mod storage;

pub use storage::RecordStorage;
