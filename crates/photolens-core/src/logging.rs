//! Structured logging schema and field name constants for photolens.
//!
//! All crates use these field names for consistent structured logging, so
//! log aggregation can query across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Upstream or internal failure surfaced to a caller |
//! | WARN  | Denied origin, lenient schema violations, lockdown config |
//! | INFO  | Lifecycle events (startup), completed analyses |
//! | DEBUG | Decision points: selected variant, model, payload sizes |
//! | TRACE | Full prompt text |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "pipeline", "inference", "upload"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "access_gate", "gemini", "normalizer", "cloudinary"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "analyze", "generate", "list_models", "upload"
pub const OPERATION: &str = "op";

// ─── Request fields ────────────────────────────────────────────────────────

/// Caller `Origin` header value.
pub const ORIGIN: &str = "origin";

/// Selected variant (theme) name.
pub const VARIANT: &str = "variant";

/// Image MIME type sent to the model.
pub const MIME_TYPE: &str = "mime_type";

/// Decoded image size in bytes.
pub const IMAGE_BYTES: &str = "image_bytes";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of the assembled instruction.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Total tokens reported by the provider.
pub const TOTAL_TOKENS: &str = "total_tokens";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for generation.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Stable error code (`ErrorKind::code`).
pub const ERROR_CODE: &str = "error_code";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
