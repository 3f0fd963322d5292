//! HTTP error responses.
//!
//! [`ApiError`] is the only place a pipeline [`Error`] becomes an HTTP
//! response. The body is `{"error": <code>, "details": <text>}` where
//! `error` is the stable code from [`ErrorKind::code`].

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use photolens_core::{Error, ErrorKind};
use serde::Serialize;
use tracing::{debug, error, warn};
use utoipa::ToSchema;

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Stable error code (e.g. `invalid_input`, `upstream_failure`).
    pub error: String,
    /// Diagnostic text. Not stable; do not match on it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status =
            StatusCode::from_u16(kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match kind {
            ErrorKind::InternalError | ErrorKind::UpstreamFailure | ErrorKind::MalformedOutput => {
                error!(
                    subsystem = "api",
                    component = "error",
                    error_code = kind.code(),
                    error = %self.0,
                    "Request failed"
                );
            }
            ErrorKind::Forbidden => {
                warn!(subsystem = "api", component = "error", error = %self.0, "Request refused");
            }
            ErrorKind::InvalidInput | ErrorKind::MethodNotAllowed => {
                debug!(subsystem = "api", component = "error", error = %self.0, "Request rejected");
            }
        }

        let detail = self.0.detail();
        let body = ErrorBody {
            error: kind.code().to_string(),
            details: (!detail.is_empty()).then(|| detail.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

/// Response used when a handler panics.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(subsystem = "api", component = "panic", panic = message, "Handler panicked");

    ApiError(Error::Internal("Unexpected server failure".to_string())).into_response()
}
