//! Show handler.
//!
//! `GET [base]/api/[resource]/[id]`

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

/// Handler for reading one record.
///
/// Honors `fields` and `embed`; other listing parameters are ignored.
///
/// # HTTP Request
///
/// `GET [base]/api/[resource]/[id]?fields=id,title&embed=author`
///
/// # Response
///
/// - `200 OK` - `{"data": {...}}`
/// - `400 Bad Request` - Invalid `fields` or `embed`
/// - `404 Not Found` - Unknown resource or record, empty body
pub async fn show_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource, id)): Path<(String, String)>,
    params: QueryParams,
) -> RestResult<Response>
where
    S: RecordStorage + Send + Sync,
{
    debug!(resource = %resource, id = %id, "Processing show request");

    let schema = state
        .schema(&resource)
        .ok_or_else(|| RestError::UnknownResource {
            name: resource.clone(),
        })?;

    let item = state.orchestrator().show(&schema, &id, &params).await?;

    Ok(DataResponse::one(item).into_response())
}
