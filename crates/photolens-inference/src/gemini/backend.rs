//! Gemini generation backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use photolens_core::defaults::{self, *};
use photolens_core::{Error, Result, TokenUsage};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::{to_photolens_error, GeminiErrorCode};
use super::types::*;
use crate::generation::{GenerationBackend, GenerationOptions, GenerationOutput, GenerationRequest};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest accepted model identifier.
const MAX_MODEL_NAME_LEN: usize = 128;

/// Configuration for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL (without version path).
    pub base_url: String,
    /// API key. Required for every call; checked at call time.
    pub api_key: Option<String>,
    /// Default model.
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GEMINI_BASE_URL.to_string(),
            api_key: None,
            model: defaults::GEMINI_MODEL.to_string(),
            temperature: defaults::GEMINI_TEMPERATURE,
            top_p: defaults::GEMINI_TOP_P,
            timeout_seconds: defaults::GEMINI_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            base_url: get(ENV_GEMINI_BASE_URL)
                .unwrap_or_else(|| defaults::GEMINI_BASE_URL.to_string()),
            api_key: get(ENV_GEMINI_API_KEY),
            model: get(ENV_GEMINI_MODEL).unwrap_or_else(|| defaults::GEMINI_MODEL.to_string()),
            temperature: get(ENV_GEMINI_TEMPERATURE)
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::GEMINI_TEMPERATURE),
            top_p: get(ENV_GEMINI_TOP_P)
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::GEMINI_TOP_P),
            timeout_seconds: get(ENV_GEMINI_TIMEOUT)
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::GEMINI_TIMEOUT_SECS),
        }
    }
}

/// Validate a caller-supplied model identifier.
///
/// Accepts `gemini-2.0-flash` or `models/gemini-2.0-flash` and returns the
/// bare name. The name is placed in the request path, so only ASCII
/// alphanumerics, `-`, `_` and `.` are allowed.
pub fn validate_model_name(model: &str) -> Result<String> {
    let name = model.trim();
    let name = name.strip_prefix("models/").unwrap_or(name);
    if name.is_empty() {
        return Err(Error::InvalidInput("Model name must not be empty".to_string()));
    }
    if name.len() > MAX_MODEL_NAME_LEN {
        return Err(Error::InvalidInput(format!(
            "Model name exceeds {} characters",
            MAX_MODEL_NAME_LEN
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        || name.starts_with('.')
    {
        return Err(Error::InvalidInput(format!("Invalid model name '{}'", name)));
    }
    Ok(name.to_string())
}

/// Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "gemini",
            base_url = %config.base_url,
            model = %config.model,
            api_key_set = config.api_key.is_some(),
            "Initializing Gemini backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config(format!("{} is not set", ENV_GEMINI_API_KEY)))
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            GEMINI_API_VERSION,
            path
        )
    }

    /// Resolve per-call options against configured defaults.
    fn resolve(&self, options: &GenerationOptions) -> Result<(String, f32, f32)> {
        let model = match options.model.as_deref() {
            Some(m) => validate_model_name(m)?,
            None => self.config.model.clone(),
        };
        Ok((
            model,
            options.temperature.unwrap_or(self.config.temperature),
            options.top_p.unwrap_or(self.config.top_p),
        ))
    }

    /// Build the request body: image part first, then the instruction.
    pub(crate) fn build_body(
        request: &GenerationRequest<'_>,
        temperature: f32,
        top_p: f32,
    ) -> GenerateContentRequest {
        let data = base64::engine::general_purpose::STANDARD.encode(request.image);
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::inline(request.mime_type, data),
                    Part::text(request.instruction),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.schema.clone(),
                temperature: Some(temperature),
                top_p: Some(top_p),
            },
        }
    }

    /// Turn a non-success response into an upstream failure.
    async fn error_from_response(response: Response, op: &str) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let (error_status, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => (
                envelope.error.status.unwrap_or_default(),
                envelope.error.message,
            ),
            Err(_) => (String::new(), body.chars().take(512).collect()),
        };
        let code = GeminiErrorCode::from_response(status, &error_status);
        warn!(
            subsystem = "inference",
            component = "gemini",
            op = op,
            status = status,
            error_status = %error_status,
            retryable = code.is_retryable(),
            error = %message,
            "Gemini request failed"
        );
        to_photolens_error(code, status, &message)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<GenerationOutput> {
        let (model, temperature, top_p) = self.resolve(&request.options)?;
        let api_key = self.api_key()?;
        let body = Self::build_body(request, temperature, top_p);
        let url = self.endpoint(&format!("models/{}:generateContent", model));

        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "generate",
            model = %model,
            mime_type = request.mime_type,
            image_bytes = request.image.len(),
            prompt_len = request.instruction.len(),
            "Sending generation request"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, "generate").await);
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse Gemini response: {}", e)))?;

        if let Some(reason) = result
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(Error::Upstream(format!("Gemini blocked the prompt: {}", reason)));
        }

        let text = result.first_text().ok_or_else(|| {
            Error::Upstream(format!(
                "Gemini returned no text (finish reason: {})",
                result.finish_reason().unwrap_or("none")
            ))
        })?;

        let usage = result.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            response_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });
        let served_by = result.model_version.clone().unwrap_or(model);

        info!(
            subsystem = "inference",
            component = "gemini",
            op = "generate",
            model = %served_by,
            response_len = text.len(),
            total_tokens = usage.map(|u| u.total_tokens).unwrap_or(0),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generation complete"
        );

        Ok(GenerationOutput {
            text,
            usage,
            model: served_by,
        })
    }

    async fn list_models(&self) -> Result<Vec<Value>> {
        let api_key = self.api_key()?;
        let response = self
            .client
            .get(self.endpoint("models"))
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, "list_models").await);
        }

        let listing: ListModelsResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse model listing: {}", e)))?;

        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "list_models",
            count = listing.models.len(),
            "Model listing fetched"
        );
        Ok(listing.models)
    }

    async fn health_check(&self) -> Result<bool> {
        let Ok(api_key) = self.api_key() else {
            warn!("Gemini health check skipped: {} is not set", ENV_GEMINI_API_KEY);
            return Ok(false);
        };

        let response = self
            .client
            .get(self.endpoint("models"))
            .header(API_KEY_HEADER, api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("Gemini health check passed");
                Ok(true)
            }
            Ok(resp) => {
                warn!("Gemini health check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Gemini health check error: {}", e);
                Ok(false)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = GeminiConfig::default();
        assert_eq!(config.base_url, defaults::GEMINI_BASE_URL);
        assert_eq!(config.model, defaults::GEMINI_MODEL);
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_seconds, defaults::GEMINI_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_from_lookup() {
        let map: HashMap<&str, &str> = [
            (ENV_GEMINI_API_KEY, "key-123"),
            (ENV_GEMINI_MODEL, "gemini-1.5-pro"),
            (ENV_GEMINI_TEMPERATURE, "0.4"),
            (ENV_GEMINI_TIMEOUT, "not-a-number"),
        ]
        .into_iter()
        .collect();
        let config = GeminiConfig::from_lookup(|k| map.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("key-123"));
        assert_eq!(config.model, "gemini-1.5-pro");
        assert!((config.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.timeout_seconds, defaults::GEMINI_TIMEOUT_SECS);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = GeminiConfig::from_lookup(|k| {
            (k == ENV_GEMINI_API_KEY).then(|| "   ".to_string())
        });
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_validate_model_name() {
        assert_eq!(validate_model_name("gemini-2.0-flash").unwrap(), "gemini-2.0-flash");
        assert_eq!(
            validate_model_name("models/gemini-1.5-pro").unwrap(),
            "gemini-1.5-pro"
        );
        assert!(validate_model_name("").is_err());
        assert!(validate_model_name("models/").is_err());
        assert!(validate_model_name("../admin").is_err());
        assert!(validate_model_name("gemini?key=x").is_err());
        assert!(validate_model_name(&"a".repeat(200)).is_err());
    }

    #[test]
    fn test_invalid_model_is_invalid_input() {
        let err = validate_model_name("a/b").unwrap_err();
        assert_eq!(err.kind(), photolens_core::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_build_body_puts_image_before_instruction() {
        let schema = json!({ "type": "OBJECT" });
        let request = GenerationRequest {
            image: &[0xFF, 0xD8, 0xFF],
            mime_type: "image/jpeg",
            instruction: "Analyze this portrait",
            schema: &schema,
            options: GenerationOptions::default(),
        };
        let body = GeminiBackend::build_body(&request, 1.0, 0.95);
        let value = serde_json::to_value(&body).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "/9j/");
        assert_eq!(parts[1]["text"], "Analyze this portrait");
        assert_eq!(value["generationConfig"]["responseSchema"], schema);
        assert_eq!(value["generationConfig"]["topP"], json!(0.95_f32));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let backend = GeminiBackend::new(GeminiConfig {
            base_url: "http://localhost:9000/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            backend.endpoint("models"),
            "http://localhost:9000/v1beta/models"
        );
    }

    #[test]
    fn test_resolve_prefers_options() {
        let backend = GeminiBackend::new(GeminiConfig::default()).unwrap();
        let (model, temperature, top_p) = backend
            .resolve(&GenerationOptions {
                model: Some("gemini-1.5-flash".to_string()),
                temperature: Some(0.2),
                top_p: None,
            })
            .unwrap();
        assert_eq!(model, "gemini-1.5-flash");
        assert!((temperature - 0.2).abs() < f32::EPSILON);
        assert!((top_p - defaults::GEMINI_TOP_P).abs() < f32::EPSILON);
    }
}
