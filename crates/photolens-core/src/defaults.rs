//! Centralized default constants for photolens.
//!
//! All crates reference these constants instead of defining their own
//! magic numbers or environment variable names.

// =============================================================================
// GENERATION
// =============================================================================

/// Default Gemini model used for analysis.
pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default Gemini REST endpoint (without version path).
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// API version segment for the Generative Language API.
pub const GEMINI_API_VERSION: &str = "v1beta";

/// Sampling temperature. Kept high so repeated analyses of one image differ.
pub const GEMINI_TEMPERATURE: f32 = 1.0;

/// Nucleus sampling cutoff.
pub const GEMINI_TOP_P: f32 = 0.95;

/// Request timeout in seconds for a single generation round trip.
pub const GEMINI_TIMEOUT_SECS: u64 = 120;

/// MIME type assumed when neither a data-URI prefix nor magic bytes identify the image.
pub const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const HOST: &str = "0.0.0.0";

/// Default bind port.
pub const PORT: u16 = 3000;

/// Maximum accepted request body (base64 images are large).
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Request headers browsers may send on cross-origin calls.
pub const CORS_ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// Methods advertised on preflight responses.
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";

// =============================================================================
// UPLOAD
// =============================================================================

/// Cloudinary upload API base.
pub const CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Placeholder network identity when no forwarding header is present.
pub const UNKNOWN_CLIENT_IP: &str = "unknown";

// =============================================================================
// ENVIRONMENT VARIABLE NAMES
// =============================================================================

pub const ENV_PRIMARY_DOMAIN: &str = "PRIMARY_DOMAIN";
pub const ENV_LOCALHOST: &str = "LOCALHOST";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_GEMINI_TEMPERATURE: &str = "GEMINI_TEMPERATURE";
pub const ENV_GEMINI_TOP_P: &str = "GEMINI_TOP_P";
pub const ENV_GEMINI_TIMEOUT: &str = "GEMINI_TIMEOUT";
pub const ENV_VALIDATION_MODE: &str = "VALIDATION_MODE";
pub const ENV_CLOUDINARY_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
pub const ENV_CLOUDINARY_UPLOAD_PRESET: &str = "CLOUDINARY_UPLOAD_PRESET";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";
