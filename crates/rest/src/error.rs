//! Error types for the Bookland API.
//!
//! This module defines all error types used throughout the REST API layer,
//! with automatic conversion to the JSON error envelope.
//!
//! # Error Mapping
//!
//! | Error | HTTP Status | Body |
//! |-------|-------------|------|
//! | InvalidParams | 400 | `{"error":{"invalid_params":"sort=fid"}}` |
//! | Unauthorized | 401 | empty, plus `WWW-Authenticate` |
//! | NotFound / UnknownResource | 404 | empty |
//! | InternalError | 500 | `{"error":{"message":...}}` |
//!
//! Storage errors from the persistence layer always map to 500; the pipeline
//! never retries them.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bookland_persistence::error::StorageError;
use serde::Serialize;
use std::fmt;

/// A client-supplied parameter that failed validation.
///
/// Renders as `parameter=value`, e.g. `q[fname_cont]=Reilly`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidParam {
    /// The parameter name as the client wrote it.
    pub parameter: String,
    /// The offending raw value.
    pub value: String,
}

impl InvalidParam {
    /// Creates an invalid parameter entry.
    pub fn new(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for InvalidParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.parameter, self.value)
    }
}

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// One or more query parameters failed validation (HTTP 400).
    InvalidParams(Vec<InvalidParam>),

    /// Missing or unrecognised credentials (HTTP 401).
    Unauthorized {
        /// Realm advertised in the challenge.
        realm: String,
    },

    /// Record not found (HTTP 404).
    NotFound {
        /// The resource name (e.g., "books").
        resource_type: String,
        /// The requested identifier.
        id: String,
    },

    /// The path names a resource that is not exposed (HTTP 404).
    UnknownResource {
        /// The requested resource name.
        name: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::NotFound { .. } | RestError::UnknownResource { .. } => {
                StatusCode::NOT_FOUND
            }
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Joins invalid parameters in accumulation order.
fn join_params(params: &[InvalidParam]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::InvalidParams(params) => {
                write!(f, "Invalid parameters: {}", join_params(params))
            }
            RestError::Unauthorized { realm } => {
                write!(f, "Access denied for realm {}", realm)
            }
            RestError::NotFound { resource_type, id } => {
                write!(f, "Record not found: {}/{}", resource_type, id)
            }
            RestError::UnknownResource { name } => {
                write!(f, "Unknown resource: {}", name)
            }
            RestError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

/// Body of a JSON error response: `{"error": {...}}`.
#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum ErrorBody {
    InvalidParams(String),
    Message(String),
}

impl ErrorEnvelope {
    fn json(error: ErrorBody) -> Json<Self> {
        Json(Self { error })
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            RestError::InvalidParams(params) => {
                let body = ErrorBody::InvalidParams(join_params(&params));
                (status, ErrorEnvelope::json(body)).into_response()
            }
            RestError::Unauthorized { realm } => {
                let challenge = format!("Bookland-Token realm=\"{}\"", realm);
                let mut response = status.into_response();
                if let Ok(value) = HeaderValue::from_str(&challenge) {
                    response
                        .headers_mut()
                        .insert(header::WWW_AUTHENTICATE, value);
                }
                response
            }
            RestError::NotFound { .. } | RestError::UnknownResource { .. } => {
                status.into_response()
            }
            RestError::InternalError { message } => {
                (status, ErrorEnvelope::json(ErrorBody::Message(message))).into_response()
            }
        }
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Storage failure");
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

/// Result type for REST API operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bookland_persistence::error::BackendError;
    use serde_json::json;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_invalid_param_display() {
        let param = InvalidParam::new("q[fname_cont]", "Reilly");
        assert_eq!(param.to_string(), "q[fname_cont]=Reilly");
    }

    #[test]
    fn test_not_found_display() {
        let err = RestError::NotFound {
            resource_type: "books".to_string(),
            id: "123".to_string(),
        };
        assert_eq!(err.to_string(), "Record not found: books/123");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestError::InvalidParams(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RestError::UnknownResource {
                name: "magazines".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_invalid_params_single() {
        let err = RestError::InvalidParams(vec![InvalidParam::new("sort", "fid")]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body, json!({"error": {"invalid_params": "sort=fid"}}));
    }

    #[tokio::test]
    async fn test_invalid_params_joined_in_order() {
        let err = RestError::InvalidParams(vec![
            InvalidParam::new("sort", "fid"),
            InvalidParam::new("page", "fake"),
        ]);
        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"]["invalid_params"], "sort=fid; page=fake");
    }

    #[tokio::test]
    async fn test_not_found_has_empty_body() {
        let err = RestError::NotFound {
            resource_type: "books".to_string(),
            id: "9".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_unauthorized_challenge() {
        let err = RestError::Unauthorized {
            realm: "Client Realm".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Bookland-Token realm=\"Client Realm\""
        );
    }

    #[test]
    fn test_storage_error_maps_to_internal() {
        let err: RestError = StorageError::Backend(BackendError::QueryError {
            message: "boom".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
