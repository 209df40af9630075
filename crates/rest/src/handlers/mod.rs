//! HTTP request handlers.
//!
//! - [`index`] - List a resource
//! - [`show`] - Read one record
//! - [`health`] - Health and readiness endpoints

pub mod health;
pub mod index;
pub mod show;

// Re-export handlers for convenience
pub use health::{health_handler, readiness_handler};
pub use index::index_handler;
pub use show::show_handler;
