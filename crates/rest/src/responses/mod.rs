//! Response formatting for the Bookland API.
//!
//! - [`envelope`] - the `{"data": ...}` envelope and `Link` header

pub mod envelope;

pub use envelope::DataResponse;
