//! Generation backend trait for schema-constrained image analysis.

use async_trait::async_trait;
use photolens_core::{Result, TokenUsage};
use serde_json::Value;

/// Optional per-call generation parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    /// Model identifier; the backend default is used when `None`.
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

/// One generation call: image, instruction and output contract.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    pub image: &'a [u8],
    pub mime_type: &'a str,
    pub instruction: &'a str,
    /// Structured output declaration the model must follow.
    pub schema: &'a Value,
    pub options: GenerationOptions,
}

/// Raw model reply.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutput {
    /// Unparsed response text (expected to be JSON).
    pub text: String,
    pub usage: Option<TokenUsage>,
    /// Model that actually served the request.
    pub model: String,
}

/// Backend for schema-constrained generation from an image.
///
/// Implementations make exactly one round trip per `generate` call and never
/// retry; any failure is returned to the caller.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate a structured reply for an image.
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<GenerationOutput>;

    /// List models available to the configured credentials, as returned by the provider.
    async fn list_models(&self) -> Result<Vec<Value>>;

    /// Check if the backend is reachable.
    async fn health_check(&self) -> Result<bool>;

    /// Get the default model name.
    fn model_name(&self) -> &str;
}
