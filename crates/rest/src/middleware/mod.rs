//! HTTP middleware for the Bookland API.
//!
//! - [`auth`] - API key authentication

pub mod auth;

pub use auth::{ApiKeys, auth_middleware};
