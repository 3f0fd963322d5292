//! Analysis pipeline orchestration.
//!
//! decode image -> select theme -> assemble prompt -> one generation call ->
//! normalize. Each stage returns a typed error; nothing here retries.

use std::time::Instant;

use photolens_core::schema::ANALYSIS_SCHEMA;
use photolens_core::{decode_image, normalize, prompt, variants, AnalysisResult, Result, ValidationMode};
use photolens_inference::{GenerationBackend, GenerationOptions, GenerationRequest};
use tracing::{debug, info, trace};

/// Caller inputs for one analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    /// Base64 image, optionally with a `data:<mime>;base64,` prefix.
    pub image: String,
    pub variant_index: i64,
    pub prompt_override: Option<String>,
    pub model_override: Option<String>,
}

/// Run the full pipeline for one request.
pub async fn run_analysis(
    backend: &dyn GenerationBackend,
    mode: ValidationMode,
    input: &AnalysisInput,
) -> Result<AnalysisResult> {
    let start = Instant::now();

    let payload = decode_image(&input.image)?;
    let variant = variants::select(input.variant_index);
    let assembled = prompt::build(variant, &ANALYSIS_SCHEMA)
        .with_override(input.prompt_override.as_deref());

    debug!(
        subsystem = "pipeline",
        component = "analysis",
        op = "prepare",
        variant = variant.name,
        variant_index = input.variant_index,
        mime_type = %payload.mime_type,
        image_bytes = payload.bytes.len(),
        prompt_len = assembled.instruction.len(),
        prompt_overridden = input.prompt_override.is_some(),
        "Prepared analysis request"
    );
    trace!(
        subsystem = "pipeline",
        component = "analysis",
        instruction = %assembled.instruction,
        "Assembled instruction"
    );

    let request = GenerationRequest {
        image: &payload.bytes,
        mime_type: &payload.mime_type,
        instruction: &assembled.instruction,
        schema: &assembled.declaration,
        options: GenerationOptions {
            model: input.model_override.clone(),
            ..Default::default()
        },
    };
    let output = backend.generate(&request).await?;

    let result = normalize(&output.text, output.usage, &ANALYSIS_SCHEMA, mode)?;

    info!(
        subsystem = "pipeline",
        component = "analysis",
        op = "analyze",
        variant = variant.name,
        model = %output.model,
        total_tokens = output.usage.map(|u| u.total_tokens).unwrap_or(0),
        duration_ms = start.elapsed().as_millis() as u64,
        "Analysis complete"
    );

    Ok(result)
}
