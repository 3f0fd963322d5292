//! Gemini Generative Language API backend.
//!
//! Sends one `generateContent` call per analysis with the image as inline
//! data and a structured output declaration in `generationConfig`.
//!
//! # Example
//!
//! ```rust,no_run
//! use photolens_inference::gemini::{GeminiBackend, GeminiConfig};
//! use photolens_inference::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = GeminiBackend::new(GeminiConfig {
//!         api_key: Some("your-key".to_string()),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//!     let models = backend.list_models().await.unwrap();
//!     println!("{} models available", models.len());
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{validate_model_name, GeminiBackend, GeminiConfig, API_KEY_HEADER};
pub use error::{to_photolens_error, GeminiErrorCode};
pub use types::*;
