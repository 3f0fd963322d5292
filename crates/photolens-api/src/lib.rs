//! photolens-api - HTTP surface for photolens.
//!
//! Routes under `/api` pass through the origin gate and then the CORS layer;
//! `/health` and `/openapi.json` do neither.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod services;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::routing::{get, post};
use axum::Router;
use photolens_core::{AccessPolicy, ValidationMode};
use photolens_inference::GenerationBackend;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

pub use error::ApiError;
use services::AssetStore;

// =============================================================================
// STATE
// =============================================================================

/// Read-only state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn GenerationBackend>,
    /// `None` when the upload relay is not configured.
    pub asset_store: Option<Arc<dyn AssetStore>>,
    pub access: AccessPolicy,
    pub validation_mode: ValidationMode,
}

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router.
///
/// Bodies over `max_body_bytes` are rejected by the JSON extractor and
/// answered as `invalid_input`.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    let api = Router::new()
        .route(
            "/api/analyze",
            post(handlers::analyze::analyze_image).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/models",
            get(handlers::models::list_models).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/upload",
            post(handlers::upload::upload_asset).fallback(handlers::method_not_allowed),
        )
        .layer(middleware::cors_layer(&state.access))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::access_gate,
        ))
        .layer(DefaultBodyLimit::max(max_body_bytes));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/openapi.json", get(handlers::health::openapi_json))
        .merge(api)
        .with_state(state)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
