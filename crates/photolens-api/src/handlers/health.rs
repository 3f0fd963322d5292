//! Liveness and API description endpoints. Not gated by origin.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::openapi::ApiDoc;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Default generation model.
    pub model: String,
}

/// Liveness probe.
#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service is up", body = HealthResponse)))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.backend.model_name().to_string(),
    })
}

/// Generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
