//! Portrait analysis handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use photolens_core::variants::catalog_len;
use photolens_core::{AnalysisResult, Error, OriginDescriptor};
use serde::Deserialize;
use serde_json::Number;
use tracing::debug;
use utoipa::ToSchema;

use crate::services::{run_analysis, AnalysisInput};
use crate::{ApiError, AppState};

/// Request body for an analysis.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Base64 image, optionally prefixed with `data:<mime>;base64,`.
    #[serde(default)]
    pub image: String,
    /// Theme selector; any integer, wrapped onto the theme catalog. Defaults to 0.
    #[schema(value_type = Option<i64>)]
    pub variant_index: Option<Number>,
    /// Replaces the persona narrative. Output rules, theme, safety and the
    /// field list still apply.
    pub prompt_override: Option<String>,
    /// Gemini model to use instead of the configured default.
    pub model_override: Option<String>,
}

/// Map a JSON integer onto a signed index that selects the same theme.
///
/// Values above `i64::MAX` are reduced modulo the catalog size first.
fn theme_index(number: &Number) -> Result<i64, Error> {
    if let Some(index) = number.as_i64() {
        return Ok(index);
    }
    if let Some(index) = number.as_u64() {
        return Ok((index % catalog_len() as u64) as i64);
    }
    Err(Error::InvalidInput(format!(
        "variantIndex must be an integer, got {}",
        number
    )))
}

impl TryFrom<AnalyzeRequest> for AnalysisInput {
    type Error = Error;

    fn try_from(req: AnalyzeRequest) -> Result<Self, Error> {
        let variant_index = match &req.variant_index {
            Some(number) => theme_index(number)?,
            None => 0,
        };
        Ok(Self {
            image: req.image,
            variant_index,
            prompt_override: req.prompt_override,
            model_override: req.model_override,
        })
    }
}

/// Analyze a portrait and return a schema-validated report.
///
/// # Returns
/// - 200 OK with the report object (plus `tokenUsage` when reported)
/// - 400 Bad Request if the body or image is invalid
/// - 403 Forbidden if the origin is not allowed
/// - 500 on provider failure or malformed model output
#[utoipa::path(post, path = "/api/analyze", tag = "Analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis report"),
        (status = 400, description = "Invalid request", body = crate::error::ErrorBody),
        (status = 403, description = "Origin not allowed", body = crate::error::ErrorBody),
        (status = 500, description = "Upstream or output failure", body = crate::error::ErrorBody),
    ))]
pub async fn analyze_image(
    State(state): State<AppState>,
    origin: Option<Extension<OriginDescriptor>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(req) = payload?;
    let input = AnalysisInput::try_from(req)?;

    if let Some(Extension(origin)) = origin {
        debug!(
            subsystem = "api",
            component = "analyze",
            origin = %origin.origin,
            variant_index = input.variant_index,
            "Analysis requested"
        );
    }

    let result = run_analysis(state.backend.as_ref(), state.validation_mode, &input).await?;
    Ok(Json(result))
}
