//! AI metadata generation endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::generate::GenerateRequest;
use crate::metadata::MetadataRecord;
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// Generate optimized metadata from a URL, a description, or both
#[utoipa::path(
    post,
    path = "/api/v1/generate",
    tag = "Generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated metadata", body = MetadataRecord),
        (status = 400, description = "Neither url nor prompt given, or body is not valid JSON", body = ErrorResponse),
        (status = 429, description = "AI provider rate limit hit", body = ErrorResponse),
        (status = 500, description = "AI provider not configured", body = ErrorResponse),
        (status = 502, description = "AI provider failed or returned malformed output", body = ErrorResponse)
    )
)]
pub async fn generate(
    State(state): State<ApiState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<MetadataRecord>, ApiError> {
    let Json(request) = payload?;
    let record = state.generator.generate(&request).await?;
    Ok(Json(record))
}
