//! Error types for the Box connector
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! [`Error::kind`] folds every variant onto the coarse taxonomy callers
//! branch on (configuration, authentication, upstream, ...).

use thiserror::Error;

/// The main error type for the Box connector
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid or inconsistent configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A required config field is unset or blank
    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    /// A config field holds an unusable value
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    /// Config YAML could not be parsed
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Config JSON could not be parsed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Signing the JWT assertion failed
    #[error("JWT generation failed: {message}")]
    JwtGeneration { message: String },

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    /// Box refused the credentials
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// HTTP 429
    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    /// Request exceeded the configured timeout
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// A URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A Box call failed during `operation`
    #[error("Box API error while {operation}: {message}")]
    Api { operation: String, message: String },

    // ============================================================================
    // Data Errors
    // ============================================================================
    /// A response body did not have the expected shape
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// Caller supplied an unusable argument
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The requested item does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// Local I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A local file does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Anything else
    #[error("{0}")]
    Other(String),

    /// A failure remembered from an earlier attempt, keeping its class
    #[error("{message}")]
    Replayed { kind: ErrorKind, message: String },

    /// Wrapped `anyhow` error
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Coarse failure classes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing configuration, detected before any request is made
    Configuration,
    /// Credentials rejected by Box
    Authentication,
    /// A Box API call failed after authentication
    Upstream,
    /// Caller passed an unusable argument
    InvalidArgument,
    /// The requested item does not exist
    NotFound,
    /// Anything else
    Internal,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an API error tagged with the operation that failed
    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. }
            | Error::YamlParse(_)
            | Error::JsonParse(_)
            | Error::JwtGeneration { .. }
            | Error::FileNotFound { .. } => ErrorKind::Configuration,

            Error::Auth { .. } => ErrorKind::Authentication,

            Error::HttpStatus { status: 401, .. } => ErrorKind::Authentication,
            Error::HttpStatus { status: 404, .. } | Error::NotFound { .. } => ErrorKind::NotFound,

            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::RateLimited { .. }
            | Error::Timeout { .. }
            | Error::InvalidUrl(_)
            | Error::Api { .. }
            | Error::Decode { .. } => ErrorKind::Upstream,

            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,

            Error::Replayed { kind, .. } => *kind,

            Error::Io(_) | Error::Other(_) | Error::Anyhow(_) => ErrorKind::Internal,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the Box connector
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Wrap a failed Box call as an [`Error::Api`] for `operation`,
    /// keeping configuration, authentication and not-found failures intact
    fn api_context(self, operation: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn api_context(self, operation: &str) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            match inner {
                // Already names the call that failed
                Error::Api { .. } => inner,
                _ if inner.kind() == ErrorKind::Upstream => Error::api(operation, inner.to_string()),
                _ => inner,
            }
        })
    }
}
