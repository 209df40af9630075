//! Axum extractors for Bookland requests.
//!
//! - [`QueryParams`] - Extract filter, sort, pagination and shaping parameters

mod query_params;

pub use query_params::{FilterParam, QueryParams};
