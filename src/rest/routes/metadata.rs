//! Page metadata endpoint.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::metadata::MetadataRecord;
use crate::rest::dto::MetadataQuery;
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// Fetch and analyze a page
#[utoipa::path(
    get,
    path = "/api/v1/metadata",
    tag = "Metadata",
    params(MetadataQuery),
    responses(
        (status = 200, description = "Extracted metadata", body = MetadataRecord),
        (status = 400, description = "Missing or invalid URL", body = ErrorResponse),
        (status = 502, description = "Page could not be fetched", body = ErrorResponse)
    )
)]
pub async fn fetch(
    State(state): State<ApiState>,
    Query(query): Query<MetadataQuery>,
) -> Result<Json<MetadataRecord>, ApiError> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("URL is required".to_string()))?;

    let record = state.fetcher.fetch(&url).await?;
    Ok(Json(record))
}
