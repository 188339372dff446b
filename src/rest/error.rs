//! API error types and responses.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::generate::GenerateError;
use crate::metadata::FetchError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found
    NotFound(String),
    /// Bad request
    BadRequest(String),
    /// Internal server error
    InternalError(String),
    /// An upstream page or AI service failed
    BadGateway(String),
    /// The AI provider is rate limiting us
    TooManyRequests {
        message: String,
        retry_after_secs: Option<u64>,
    },
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut retry_after = None;
        let (status, error, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg),
            ApiError::TooManyRequests {
                message,
                retry_after_secs,
            } => {
                retry_after = retry_after_secs;
                (StatusCode::TOO_MANY_REQUESTS, "rate_limited", message)
            }
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %message, "Request failed");
        }

        let mut response = (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, secs.into());
        }
        response
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidUrl(_) => ApiError::BadRequest(err.to_string()),
            FetchError::Request { .. } | FetchError::Status { .. } => {
                ApiError::BadGateway(err.to_string())
            }
        }
    }
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::MissingInput => ApiError::BadRequest(err.to_string()),
            GenerateError::NotConfigured | GenerateError::Template(_) => {
                ApiError::InternalError(err.to_string())
            }
            GenerateError::Provider(ref e) if e.is_rate_limited() => ApiError::TooManyRequests {
                retry_after_secs: e.retry_after(),
                message: err.to_string(),
            },
            GenerateError::Provider(_) | GenerateError::MalformedResponse(_) => {
                ApiError::BadGateway(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_not_found_response() {
        let error = ApiError::NotFound("Step 9 not found".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.error, "not_found");
        assert_eq!(json.message, "Step 9 not found");
    }

    #[tokio::test]
    async fn test_not_configured_is_internal() {
        let response = ApiError::from(GenerateError::NotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.message, "Gemini API key is not configured");
    }

    #[test]
    fn test_generate_error_statuses() {
        let status = |e: GenerateError| ApiError::from(e).into_response().status();

        assert_eq!(status(GenerateError::MissingInput), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(GenerateError::MalformedResponse("eof".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(GenerateError::Provider(crate::api::ApiError::empty_response(
                "gemini"
            ))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let err = GenerateError::Provider(crate::api::ApiError::rate_limited("gemini", Some(30)));
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "30");

        let err = GenerateError::Provider(crate::api::ApiError::rate_limited("gemini", None));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn test_fetch_error_statuses() {
        let status = |e: FetchError| ApiError::from(e).into_response().status();

        assert_eq!(
            status(FetchError::InvalidUrl(" ".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(FetchError::Status {
                url: "https://x.test/".to_string(),
                status: 404
            }),
            StatusCode::BAD_GATEWAY
        );
    }
}
