//! Server configuration for the Bookland API.
//!
//! Every setting is a command-line flag with a `BOOKLAND_*` environment
//! fallback. Paging limits and the base URL feed the query pipeline; the API
//! key list switches authentication on.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BOOKLAND_PORT` | 8080 | Server port |
//! | `BOOKLAND_HOST` | 127.0.0.1 | Host to bind |
//! | `BOOKLAND_LOG_LEVEL` | info | Log level |
//! | `BOOKLAND_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `BOOKLAND_ENABLE_CORS` | true | Enable CORS |
//! | `BOOKLAND_CORS_ORIGINS` | * | Allowed origins |
//! | `BOOKLAND_CORS_METHODS` | GET,OPTIONS | Allowed methods |
//! | `BOOKLAND_CORS_HEADERS` | Content-Type,Authorization,Accept | Allowed headers |
//! | `BOOKLAND_BASE_URL` | http://localhost:8080 | Server base URL |
//! | `BOOKLAND_DATABASE_URL` | bookland.db | SQLite path, or `:memory:` |
//! | `BOOKLAND_DEFAULT_PAGE_SIZE` | 10 | Page size when `per` is absent |
//! | `BOOKLAND_MAX_PAGE_SIZE` | 100 | Largest accepted `per` |
//! | `BOOKLAND_API_KEYS` | (empty) | Accepted API keys, comma-separated |
//!
//! # Example
//!
//! ```rust
//! use bookland_rest::ServerConfig;
//!
//! let from_env = ServerConfig::from_env();
//! assert!(from_env.max_page_size >= from_env.default_page_size);
//!
//! let config = ServerConfig {
//!     api_keys: "secret".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.requires_authentication());
//! ```

use clap::Parser;

/// Realm advertised in `WWW-Authenticate` challenges.
pub const AUTH_REALM: &str = "Client Realm";

/// Server configuration for the Bookland API.
///
/// Parsed by the `bookland` binary with [`ServerConfig::parse`]; tests and
/// embedders build it directly.
#[derive(Debug, Clone, Parser)]
#[command(name = "bookland")]
#[command(about = "Bookland JSON API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "BOOKLAND_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "BOOKLAND_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "BOOKLAND_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "BOOKLAND_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "BOOKLAND_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "BOOKLAND_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "BOOKLAND_CORS_METHODS", default_value = "GET,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "BOOKLAND_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept"
    )]
    pub cors_headers: String,

    /// Base URL for the server (used in pagination links).
    #[arg(long, env = "BOOKLAND_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// SQLite database path, or `:memory:` for an in-memory database.
    #[arg(long, env = "BOOKLAND_DATABASE_URL", default_value = "bookland.db")]
    pub database_url: String,

    /// Page size used when a request carries no `per` parameter.
    #[arg(long, env = "BOOKLAND_DEFAULT_PAGE_SIZE", default_value = "10")]
    pub default_page_size: u64,

    /// Largest page size a client may request.
    #[arg(long, env = "BOOKLAND_MAX_PAGE_SIZE", default_value = "100")]
    pub max_page_size: u64,

    /// Accepted API keys (comma-separated). Empty disables authentication.
    #[arg(long, env = "BOOKLAND_API_KEYS", default_value = "")]
    pub api_keys: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept".to_string(),
            base_url: "http://localhost:8080".to_string(),
            database_url: "bookland.db".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            api_keys: String::new(),
        }
    }
}

impl ServerConfig {
    /// Reads `BOOKLAND_*` variables only, ignoring process arguments.
    ///
    /// Falls back to [`Default`] when a variable does not parse.
    pub fn from_env() -> Self {
        Self::try_parse_from(["bookland"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the base URL without a trailing slash.
    pub fn full_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Returns whether the database lives in memory.
    pub fn is_memory_database(&self) -> bool {
        self.database_url == ":memory:"
    }

    /// Returns the configured API keys, ignoring blank entries.
    pub fn api_keys(&self) -> Vec<&str> {
        self.api_keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// Returns whether requests must carry an API key.
    pub fn requires_authentication(&self) -> bool {
        !self.api_keys().is_empty()
    }

    /// Returns every configuration problem at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if self.database_url.trim().is_empty() {
            errors.push("Database URL cannot be empty".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            errors.push(format!("Base URL is not a valid URL: {}", self.base_url));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Configuration used by the test harness.
    ///
    /// In-memory database, no CORS, no authentication. `Link` headers point
    /// at `http://test.host`.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://test.host".to_string(),
            database_url: ":memory:".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            api_keys: String::new(),
        }
    }
}
