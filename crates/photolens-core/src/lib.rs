//! # photolens-core
//!
//! Core types and pure pipeline stages for the photolens portrait analysis
//! service: access control, theme selection, the analysis schema, prompt
//! assembly, image payload decoding, output normalization and upload
//! metadata sanitization.
//!
//! This crate performs no network I/O. The generation client lives in
//! `photolens-inference` and the HTTP surface in `photolens-api`.

pub mod access;
pub mod config;
pub mod defaults;
pub mod error;
pub mod image;
pub mod logging;
pub mod normalize;
pub mod prompt;
pub mod sanitize;
pub mod schema;
pub mod variants;

// Re-export commonly used types at crate root
pub use access::{AccessDecision, AccessPolicy, OriginDescriptor};
pub use config::{CloudinaryConfig, ServiceConfig};
pub use error::{Error, ErrorKind, Result};
pub use image::{decode_image, ImagePayload};
pub use normalize::{normalize, AnalysisResult, TokenUsage, ValidationMode};
pub use prompt::AssembledPrompt;
pub use schema::{AnalysisSchema, FieldKind, FieldSpec, ANALYSIS_SCHEMA};
pub use variants::Variant;
