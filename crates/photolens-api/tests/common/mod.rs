//! Shared helpers for router tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use photolens_api::services::AssetStore;
use photolens_api::{router, AppState};
use photolens_core::schema::{FieldKind, FieldSpec, ANALYSIS_SCHEMA};
use photolens_core::{AccessPolicy, ValidationMode};
use photolens_inference::mock::MockGenerationBackend;
use serde_json::{Map, Value};
use tower::ServiceExt;

pub const ALLOWED_ORIGIN: &str = "https://app.example.com";
pub const DENIED_ORIGIN: &str = "https://evil.test";

/// PNG signature as a data URI.
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgo=";

/// JFIF header as a data URI.
pub const JPEG_DATA_URI: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQ==";

pub fn policy() -> AccessPolicy {
    AccessPolicy::new(Some("example.com".to_string()), false)
}

pub fn app(backend: MockGenerationBackend) -> Router {
    app_with(backend, policy(), ValidationMode::Strict, None)
}

pub fn app_with(
    backend: MockGenerationBackend,
    access: AccessPolicy,
    validation_mode: ValidationMode,
    asset_store: Option<Arc<dyn AssetStore>>,
) -> Router {
    let state = AppState {
        backend: Arc::new(backend),
        asset_store,
        access,
        validation_mode,
    };
    router(state, 1024 * 1024)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable")
        .to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn request(method: Method, uri: &str, origin: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(origin) = origin {
        builder = builder.header("origin", origin);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid request")
}

/// A report that satisfies every required field of the analysis schema.
pub fn sample_report() -> Value {
    Value::Object(sample_object(&ANALYSIS_SCHEMA.fields))
}

fn sample_object(fields: &[FieldSpec]) -> Map<String, Value> {
    fields
        .iter()
        .filter(|f| f.required)
        .map(|f| (f.name.to_string(), sample_value(f)))
        .collect()
}

fn sample_value(field: &FieldSpec) -> Value {
    match &field.kind {
        FieldKind::String => Value::String(format!("{} note", field.name)),
        FieldKind::Enum(allowed) => Value::String(allowed[0].to_string()),
        FieldKind::StringArray => Value::Array(vec![Value::String("tip".to_string())]),
        FieldKind::Object(children) => Value::Object(sample_object(children)),
        FieldKind::ObjectArray(children) => Value::Array(vec![Value::Object(sample_object(children))]),
    }
}
