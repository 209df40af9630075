//! Index handler.
//!
//! `GET [base]/api/[resource]`

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use bookland_persistence::core::RecordStorage;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::QueryParams;
use crate::responses::DataResponse;
use crate::state::AppState;

/// Handler for listing a resource.
///
/// Filters, orders, paginates and shapes the collection according to the
/// query parameters.
///
/// # HTTP Request
///
/// `GET [base]/api/[resource]?q[title_cont]=Rust&sort=title&dir=asc&page=1&per=10&fields=id,title&embed=author`
///
/// # Response
///
/// - `200 OK` - `{"data": [...]}`, with a `Link: <...>; rel="next"` header
///   when a further page is plausible
/// - `400 Bad Request` - `{"error": {"invalid_params": "..."}}`
/// - `404 Not Found` - Unknown resource
pub async fn index_handler<S>(
    State(state): State<AppState<S>>,
    Path(resource): Path<String>,
    params: QueryParams,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(resource = %resource, params = ?params, "Processing index request");

    let schema = state
        .schema(&resource)
        .ok_or_else(|| RestError::UnknownResource {
            name: resource.clone(),
        })?;

    let outcome = state.orchestrator().handle(&schema, &params).await?;

    debug!(
        resource = %resource,
        count = outcome.items.len(),
        has_next = outcome.page_info.has_next,
        "Returning page"
    );

    let url = format!("{}/api/{}", state.base_url(), resource);
    Ok(DataResponse::page(outcome.items, &outcome.page_info, &url).into_response())
}
