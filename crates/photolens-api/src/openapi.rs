//! OpenAPI document.

use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::handlers::{analyze, health, models, upload};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Photolens API",
        description = "Schema-constrained portrait analysis with origin-gated access"
    ),
    paths(
        analyze::analyze_image,
        models::list_models,
        upload::upload_asset,
        health::health_check,
    ),
    components(schemas(
        analyze::AnalyzeRequest,
        models::ModelListResponse,
        upload::UploadRequest,
        health::HealthResponse,
        ErrorBody,
    )),
    tags(
        (name = "Analysis", description = "Portrait analysis"),
        (name = "Models", description = "Provider model listing"),
        (name = "Upload", description = "Media upload relay"),
        (name = "System", description = "Health and metadata"),
    )
)]
pub struct ApiDoc;
