//! REST API for metadata checking, generation and the SEO wizard.
//!
//! Handlers are stateless apart from the shared services in [`ApiState`];
//! wizard navigation round-trips a snapshot instead of keeping sessions.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Default port for the REST API server
pub const DEFAULT_PORT: u16 = 7009;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        // Metadata endpoints
        .route("/api/v1/metadata", get(routes::metadata::fetch))
        .route("/api/v1/generate", post(routes::generate::generate))
        // Wizard endpoints
        .route("/api/v1/wizard/steps", get(routes::wizard::list_steps))
        .route(
            "/api/v1/wizard/classify/:field",
            get(routes::wizard::classify),
        )
        .route("/api/v1/wizard/navigate", post(routes::wizard::navigate))
        .route(
            "/api/v1/wizard/steps/:index/view",
            post(routes::wizard::view_step),
        )
        .route("/api/v1/openapi.json", get(openapi_json))
        .route("/api/v1/openapi.yaml", get(openapi_yaml))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Result<impl IntoResponse, error::ApiError> {
    let spec = ApiDoc::json().map_err(|e| error::ApiError::InternalError(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], spec))
}

async fn openapi_yaml() -> Result<impl IntoResponse, error::ApiError> {
    let spec = ApiDoc::yaml().map_err(|e| error::ApiError::InternalError(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/yaml")], spec))
}

/// Start the REST API server; returns after Ctrl-C
pub async fn serve(state: ApiState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let ip = bind
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid bind address '{}'", bind))?;
    let addr = SocketAddr::new(ip, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("REST API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("REST API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_build_router() {
        let state = ApiState::new(Config::default()).unwrap();
        let _router = build_router(state);
        // Router builds without panicking
    }
}
