//! # photolens-inference
//!
//! Generation backend abstraction for photolens.
//!
//! This crate provides:
//! - The [`GenerationBackend`] trait used by the analysis pipeline
//! - A Gemini `generateContent` implementation
//! - Model listing helpers and a recommended model table
//! - A mock backend for tests (feature `mock`)
//!
//! # Feature Flags
//!
//! - `mock`: Enable [`mock::MockGenerationBackend`] outside this crate's tests

pub mod gemini;
pub mod generation;
pub mod models;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use gemini::{GeminiBackend, GeminiConfig};
pub use generation::{GenerationBackend, GenerationOptions, GenerationOutput, GenerationRequest};
pub use models::{RecommendedModel, RECOMMENDED_MODELS};
