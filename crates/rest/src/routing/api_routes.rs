//! API route configuration.

use axum::{Router, middleware::from_fn_with_state, routing::get};
use bookland_persistence::core::RecordStorage;

use crate::handlers;
use crate::middleware::{ApiKeys, auth_middleware};
use crate::state::AppState;

/// Creates all routes.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET /_readiness` - Readiness probe
/// - `GET /api/{resource}` - Index
/// - `GET /api/{resource}/{id}` - Show
///
/// When API keys are configured, the `/api` routes require
/// `Authorization: Bookland-Token api_key=<key>`.
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RecordStorage + Send + Sync + 'static,
{
    let mut api = Router::new()
        .route("/{resource}", get(handlers::index_handler::<S>))
        .route("/{resource}/{id}", get(handlers::show_handler::<S>));

    let keys = state.config().api_keys();
    if !keys.is_empty() {
        api = api.route_layer(from_fn_with_state(ApiKeys::new(keys), auth_middleware));
    }

    Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        .nest("/api", api)
        .with_state(state)
}
