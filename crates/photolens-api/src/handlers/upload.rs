//! Media upload relay handler.
//!
//! Forwards a file to the media store with the caller's tags and context,
//! after rebuilding both through the allow-list sanitizer and appending the
//! caller's network address.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use photolens_core::sanitize::{build_context, build_tags, client_address};
use photolens_core::Error;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::services::AssetUpload;
use crate::{ApiError, AppState};

/// Request body for an upload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadRequest {
    /// Data URI, base64 payload or remote URL.
    #[serde(default)]
    pub file: String,
    /// Comma-delimited tags.
    pub tags: Option<String>,
    /// Pipe-delimited `key=value` pairs.
    pub context: Option<String>,
}

/// Relay an image to the media store.
///
/// # Returns
/// - 200 OK with the store's response document
/// - 400 Bad Request if `file` is missing
/// - 500 if the relay is not configured or the store rejects the upload
#[utoipa::path(post, path = "/api/upload", tag = "Upload",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Stored asset document"),
        (status = 400, description = "No file provided", body = crate::error::ErrorBody),
        (status = 403, description = "Origin not allowed", body = crate::error::ErrorBody),
        (status = 500, description = "Relay not configured or upload failed", body = crate::error::ErrorBody),
    ))]
pub async fn upload_asset(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;

    if req.file.trim().is_empty() {
        return Err(Error::InvalidInput("No file provided".to_string()).into());
    }

    let store = state
        .asset_store
        .as_ref()
        .ok_or_else(|| Error::Config("Server configuration error".to_string()))?;

    let address = client_address(
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok()),
    );
    let upload = AssetUpload {
        file: req.file,
        tags: build_tags(req.tags.as_deref(), &address),
        context: build_context(req.context.as_deref(), &address),
    };

    let document = store.upload(&upload).await?;
    Ok(Json(document))
}
