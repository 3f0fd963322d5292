//! Error types for photolens.
//!
//! Every failure in the analysis pipeline is an [`Error`]. Each variant maps
//! onto exactly one [`ErrorKind`], which carries the stable code and HTTP
//! status used when the API layer renders the failure.

use thiserror::Error;

/// Result type alias using photolens's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for photolens operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Request payload is missing, empty, or cannot be decoded.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request origin is not permitted to use the service.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// HTTP method is not supported by the endpoint.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// External provider call failed, timed out, or returned a non-success status.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Model output was not parseable JSON or violated the declared schema.
    #[error("Malformed output: {0}")]
    MalformedOutput(String),

    /// Server configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify this error into the stable taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Forbidden(_) => ErrorKind::Forbidden,
            Error::MethodNotAllowed(_) => ErrorKind::MethodNotAllowed,
            Error::Upstream(_) => ErrorKind::UpstreamFailure,
            Error::MalformedOutput(_) => ErrorKind::MalformedOutput,
            Error::Config(_) | Error::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// Diagnostic detail without the display prefix.
    pub fn detail(&self) -> &str {
        match self {
            Error::InvalidInput(msg)
            | Error::Forbidden(msg)
            | Error::MethodNotAllowed(msg)
            | Error::Upstream(msg)
            | Error::MalformedOutput(msg)
            | Error::Config(msg)
            | Error::Internal(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Upstream(format!("Request timed out: {}", e))
        } else {
            Error::Upstream(e.to_string())
        }
    }
}

/// Stable failure taxonomy shared by every endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Forbidden,
    MethodNotAllowed,
    UpstreamFailure,
    MalformedOutput,
    InternalError,
}

impl ErrorKind {
    /// Short machine-readable code placed in the `error` field of responses.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::MethodNotAllowed => "method_not_allowed",
            ErrorKind::UpstreamFailure => "upstream_failure",
            ErrorKind::MalformedOutput => "malformed_output",
            ErrorKind::InternalError => "internal_error",
        }
    }

    /// HTTP status code for this kind.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::InvalidInput => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::UpstreamFailure | ErrorKind::MalformedOutput | ErrorKind::InternalError => {
                500
            }
        }
    }
}
