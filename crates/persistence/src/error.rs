//! Error types for the persistence layer.
//!
//! Storage failures are fatal for the request that triggered them; nothing in
//! this crate retries.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The record handed to the store could not be stored.
    #[error("invalid record for {resource_type}: {message}")]
    InvalidRecord {
        resource_type: String,
        message: String,
    },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_is_transparent() {
        let err: StorageError = BackendError::QueryError {
            message: "no such column".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "query execution failed: no such column");
    }

    #[test]
    fn test_invalid_record_display() {
        let err = StorageError::InvalidRecord {
            resource_type: "books".to_string(),
            message: "attributes must be a JSON object".to_string(),
        };
        assert!(err.to_string().contains("books"));
    }

    #[test]
    fn test_internal_error_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::other("disk gone");
        let err = BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: "write failed".to_string(),
            source: Some(Box::new(io)),
        };
        assert!(err.source().is_some());
    }
}
