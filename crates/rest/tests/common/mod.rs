//! Common test utilities for REST API testing.
//!
//! - [`harness`] - Test server wired to an in-memory SQLite backend
//! - [`fixtures`] - Catalog records seeded before requests

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;
