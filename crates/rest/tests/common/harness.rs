//! REST API test harness.
//!
//! Provides a test server running the full application stack against an
//! in-memory SQLite backend.

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestResponse, TestServer};
use bookland_persistence::backends::sqlite::SqliteBackend;

use bookland_rest::{ServerConfig, catalog, create_app_with_config};

use super::fixtures;

const AUTHORIZATION: HeaderName = HeaderName::from_static("authorization");

/// Test harness for REST API testing.
///
/// # Example
///
/// ```rust,ignore
/// let harness = RestTestHarness::seeded().await;
/// let response = harness.get("/api/books").await;
/// response.assert_status_ok();
/// ```
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// Server configuration.
    pub config: ServerConfig,
}

impl RestTestHarness {
    /// Creates a harness over an empty database.
    pub async fn new() -> Self {
        Self::build(ServerConfig::for_testing(), false).await
    }

    /// Creates a harness over the seeded fixtures.
    pub async fn seeded() -> Self {
        Self::build(ServerConfig::for_testing(), true).await
    }

    /// Creates a seeded harness with a custom configuration.
    pub async fn seeded_with_config(config: ServerConfig) -> Self {
        Self::build(config, true).await
    }

    async fn build(config: ServerConfig, seed: bool) -> Self {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to init schema");

        if seed {
            fixtures::seed(&backend).await;
        }

        let app = create_app_with_config(backend, catalog::registry(), config.clone());
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, config }
    }

    /// Makes a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.server.get(path).await
    }

    /// Makes a GET request with an `Authorization` header.
    pub async fn get_with_authorization(&self, path: &str, authorization: &str) -> TestResponse {
        self.server
            .get(path)
            .add_header(
                AUTHORIZATION,
                HeaderValue::from_str(authorization).expect("Invalid header value"),
            )
            .await
    }
}
