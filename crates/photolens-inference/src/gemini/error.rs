//! Gemini-specific error handling.

use photolens_core::Error;

/// Gemini error classes derived from HTTP status and the `error.status` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiErrorCode {
    /// Missing, invalid or unauthorized API key.
    AuthenticationError,
    /// Quota or rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available to this key.
    ModelNotFound,
    /// Request rejected as malformed (bad schema, unsupported image).
    InvalidArgument,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl GeminiErrorCode {
    /// Determine error code from HTTP status and error status string.
    pub fn from_response(status: u16, error_status: &str) -> Self {
        match (status, error_status) {
            (401, _) | (403, _) | (_, "PERMISSION_DENIED") | (_, "UNAUTHENTICATED") => {
                Self::AuthenticationError
            }
            (429, _) | (_, "RESOURCE_EXHAUSTED") => Self::RateLimitExceeded,
            (404, _) | (_, "NOT_FOUND") => Self::ModelNotFound,
            (400, _) | (_, "INVALID_ARGUMENT") | (_, "FAILED_PRECONDITION") => {
                Self::InvalidArgument
            }
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Whether the caller may reasonably re-issue the request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded | Self::ServerError)
    }
}

/// Convert a Gemini error into a photolens upstream failure.
pub fn to_photolens_error(code: GeminiErrorCode, status: u16, message: &str) -> Error {
    let label = match code {
        GeminiErrorCode::AuthenticationError => "Authentication failed",
        GeminiErrorCode::RateLimitExceeded => "Rate limit exceeded",
        GeminiErrorCode::ModelNotFound => "Model not found",
        GeminiErrorCode::InvalidArgument => "Request rejected",
        GeminiErrorCode::ServerError => "Server error",
        GeminiErrorCode::Unknown => "Unexpected response",
    };
    Error::Upstream(format!("Gemini {} (HTTP {}): {}", label, status, message))
}
