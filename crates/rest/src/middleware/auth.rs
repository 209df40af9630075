//! API key authentication middleware.
//!
//! Clients authenticate with
//! `Authorization: Bookland-Token api_key=<key>`. A request with another
//! scheme, no `api_key` credential, or a key outside the configured set is
//! answered with 401 and a `WWW-Authenticate` challenge.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::config::AUTH_REALM;
use crate::error::RestError;

/// Authorization scheme name.
pub const AUTH_SCHEME: &str = "Bookland-Token";

/// The set of accepted API keys.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: Arc<Vec<String>>,
}

impl ApiKeys {
    /// Creates a key set.
    pub fn new<I, T>(keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            keys: Arc::new(keys.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns whether `key` is accepted.
    pub fn accepts(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

/// Parses `key=value` credentials following the scheme.
///
/// Separators may be `=` or `:`; values may be quoted. Returns `None` when the
/// header does not use [`AUTH_SCHEME`].
pub fn parse_credentials(header: &str) -> Option<HashMap<String, String>> {
    let rest = header
        .strip_prefix(AUTH_SCHEME)?
        .strip_prefix(' ')?
        .replace("= ", "=")
        .replace(": ", ":");

    let credentials = rest
        .split([',', ' '])
        .filter_map(|pair| {
            let (key, value) = pair.split_once(['=', ':'])?;
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            (!key.is_empty() && !value.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect();

    Some(credentials)
}

/// Middleware rejecting requests without an accepted API key.
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn auth_middleware(
    State(keys): State<ApiKeys>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let authorized = parse_credentials(header)
        .and_then(|credentials| credentials.get("api_key").cloned())
        .is_some_and(|key| keys.accepts(&key));

    if !authorized {
        debug!(path = %request.uri().path(), "Rejected unauthenticated request");
        return RestError::Unauthorized {
            realm: AUTH_REALM.to_string(),
        }
        .into_response();
    }

    next.run(request).await
}
