//! Model listing handler.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{ApiError, AppState};

/// Provider model listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelListResponse {
    /// Always `success`.
    pub status: String,
    /// Model entries as returned by the provider.
    #[schema(value_type = Vec<Object>)]
    pub models: Vec<Value>,
    pub count: usize,
}

/// List models available to the configured API key.
#[utoipa::path(get, path = "/api/models", tag = "Models",
    responses(
        (status = 200, description = "Model listing", body = ModelListResponse),
        (status = 403, description = "Origin not allowed", body = crate::error::ErrorBody),
        (status = 500, description = "Provider failure", body = crate::error::ErrorBody),
    ))]
pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelListResponse>, ApiError> {
    let models = state.backend.list_models().await?;
    Ok(Json(ModelListResponse {
        status: "success".to_string(),
        count: models.len(),
        models,
    }))
}
