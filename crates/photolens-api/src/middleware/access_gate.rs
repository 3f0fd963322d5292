//! Origin gate and CORS policy for `/api/*` routes.
//!
//! [`access_gate`] runs before any handler work: a denied origin gets 403 and
//! nothing else happens. Allowed requests continue into [`cors_layer`], which
//! echoes the caller origin and answers `OPTIONS` preflights with 200.

use axum::extract::{Request, State};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::request::Parts;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use photolens_core::defaults::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS};
use photolens_core::{AccessDecision, AccessPolicy, Error, OriginDescriptor};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{debug, warn};

use crate::{ApiError, AppState};

/// Gate middleware, mounted with `axum::middleware::from_fn_with_state`.
pub async fn access_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());
    let descriptor = OriginDescriptor::from_header(origin);

    if let AccessDecision::Deny = state.access.evaluate_descriptor(&descriptor) {
        warn!(
            subsystem = "api",
            component = "access_gate",
            origin = %descriptor.origin,
            method = %request.method(),
            path = %request.uri().path(),
            "Origin denied"
        );
        let mut response = ApiError::from(Error::Forbidden(
            "This API is restricted to authorized domains only.".to_string(),
        ))
        .into_response();
        response
            .headers_mut()
            .insert(header::VARY, HeaderValue::from_static("Origin"));
        return response;
    }

    debug!(
        subsystem = "api",
        component = "access_gate",
        origin = %descriptor.origin,
        local = descriptor.is_local_like,
        "Origin allowed"
    );

    request.extensions_mut().insert(descriptor);
    next.run(request).await
}

/// CORS headers for origins the policy allows.
///
/// Mounted inside [`access_gate`], so it only ever sees allowed origins; the
/// predicate re-checks the policy so the layer never echoes anything else.
pub fn cors_layer(policy: &AccessPolicy) -> CorsLayer {
    let policy = policy.clone();
    let methods: Vec<Method> = CORS_ALLOW_METHODS
        .split(',')
        .filter_map(|m| m.trim().parse().ok())
        .collect();
    let headers: Vec<HeaderName> = CORS_ALLOW_HEADERS
        .split(',')
        .filter_map(|h| h.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|o| policy.evaluate(Some(o)).is_allowed())
                    .unwrap_or(false)
            },
        ))
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers))
        .allow_credentials(true)
        .vary([header::ORIGIN])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn cors_app() -> Router {
        let policy = AccessPolicy::new(Some("example.com".to_string()), false);
        Router::new()
            .route("/x", get(|| async { "ok" }))
            .layer(cors_layer(&policy))
    }

    async fn get_with_origin(origin: &str) -> Response {
        let request = axum::http::Request::builder()
            .uri("/x")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        cors_app().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_cors_layer_echoes_allowed_origin() {
        let response = get_with_origin("https://app.example.com").await;
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert!(headers[header::VARY]
            .to_str()
            .unwrap()
            .eq_ignore_ascii_case("origin"));
    }

    #[tokio::test]
    async fn test_cors_layer_never_echoes_unlisted_origin() {
        let response = get_with_origin("https://evil.test").await;
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[test]
    fn test_header_lists_parse_completely() {
        let headers = CORS_ALLOW_HEADERS
            .split(',')
            .filter_map(|h| h.trim().parse::<HeaderName>().ok())
            .count();
        assert_eq!(headers, CORS_ALLOW_HEADERS.split(',').count());
        let methods = CORS_ALLOW_METHODS
            .split(',')
            .filter_map(|m| m.trim().parse::<Method>().ok())
            .count();
        assert_eq!(methods, 3);
    }
}
