//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use photolens_inference::mock::MockGenerationBackend;
//!
//! let backend = MockGenerationBackend::new()
//!     .with_response(r#"{"summary":"ok"}"#)
//!     .with_usage(10, 5);
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use photolens_core::{Error, Result, TokenUsage};
use serde_json::{json, Value};

use crate::generation::{GenerationBackend, GenerationOutput, GenerationRequest};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    model: String,
    response: String,
    usage: Option<TokenUsage>,
    failure: Option<String>,
    models: Vec<Value>,
}

/// A recorded `generate` call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub model: Option<String>,
    pub mime_type: String,
    pub image_len: usize,
    pub instruction: String,
    pub schema: Value,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model: "mock-model".to_string(),
            response: "{}".to_string(),
            usage: None,
            failure: None,
            models: vec![json!({
                "name": "models/mock-model",
                "supportedGenerationMethods": ["generateContent"]
            })],
        }
    }
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the raw text returned by `generate`.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).response = response.into();
        self
    }

    /// Attach usage counters to every reply.
    pub fn with_usage(mut self, prompt_tokens: u64, response_tokens: u64) -> Self {
        Arc::make_mut(&mut self.config).usage = Some(TokenUsage {
            prompt_tokens,
            response_tokens,
            total_tokens: prompt_tokens + response_tokens,
        });
        self
    }

    /// Make every call fail with an upstream error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Replace the model listing.
    pub fn with_models(mut self, models: Vec<Value>) -> Self {
        Arc::make_mut(&mut self.config).models = models;
        self
    }

    /// Recorded `generate` calls, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().map(|log| log.len()).unwrap_or(0)
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<GenerationOutput> {
        if let Ok(mut log) = self.call_log.lock() {
            log.push(MockCall {
                model: request.options.model.clone(),
                mime_type: request.mime_type.to_string(),
                image_len: request.image.len(),
                instruction: request.instruction.to_string(),
                schema: request.schema.clone(),
            });
        }

        if let Some(message) = &self.config.failure {
            return Err(Error::Upstream(message.clone()));
        }

        Ok(GenerationOutput {
            text: self.config.response.clone(),
            usage: self.config.usage,
            model: request
                .options
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
        })
    }

    async fn list_models(&self) -> Result<Vec<Value>> {
        if let Some(message) = &self.config.failure {
            return Err(Error::Upstream(message.clone()));
        }
        Ok(self.config.models.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.config.failure.is_none())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
