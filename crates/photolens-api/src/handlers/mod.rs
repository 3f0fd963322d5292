//! HTTP handlers for photolens-api.

pub mod analyze;
pub mod health;
pub mod models;
pub mod upload;

use axum::http::Method;
use photolens_core::Error;

use crate::ApiError;

/// Fallback for unsupported methods on a known route.
pub async fn method_not_allowed(method: Method) -> ApiError {
    Error::MethodNotAllowed(format!("{} is not supported on this endpoint", method)).into()
}
