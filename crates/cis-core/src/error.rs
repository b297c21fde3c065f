//! Error types for CIS operations.
//!
//! Every failure an operation can produce is surfaced through [`Error`]. Errors raised
//! after a response was received carry the raw transport response so callers can
//! inspect status, headers and body even when decoding failed.

use crate::response::RawResponse;
use thiserror::Error;

/// Message used when an operation is invoked without a service URL.
pub const SERVICE_URL_MISSING: &str = "service URL is empty";

/// Message used when a caller-supplied deadline expires.
pub const DEADLINE_EXCEEDED: &str = "context deadline exceeded";

/// Main error type for CIS operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A required field or identifier is missing or invalid
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Service options or configuration are invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The service URL could not be parsed or joined
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// No service URL is configured
    #[error("{}", SERVICE_URL_MISSING)]
    ServiceUrlMissing,

    /// Authenticator configuration is invalid or unsupported
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Service could not be reached or is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Transport timeout or expired deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Request body could not be encoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A successful response body could not be decoded
    #[error("Failed to decode response: {message}")]
    ResponseDecode {
        /// Decoder error message
        message: String,
        /// Raw response as received
        response: Box<RawResponse>,
    },

    /// The service answered with a non-success status
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message extracted from the response envelope or body
        message: String,
        /// Raw response as received
        response: Box<RawResponse>,
    },
}

/// Specialized result type for CIS operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ServiceUrlMissing => "SERVICE_URL_MISSING",
            Self::Authentication(_) => "AUTHENTICATION_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
            Self::ResponseDecode { .. } => "RESPONSE_DECODE_ERROR",
            Self::Api { status, .. } => match status {
                400 => "BAD_REQUEST",
                401 | 403 => "UNAUTHORIZED",
                404 => "NOT_FOUND",
                409 => "CONFLICT",
                429 => "RATE_LIMITED",
                _ => "API_ERROR",
            },
        }
    }

    /// Returns the raw transport response, if one was received.
    #[must_use]
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            Self::ResponseDecode { response, .. } | Self::Api { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Returns the HTTP status code, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(|response| response.status_code)
    }

    /// Returns true if the service reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Returns true if a retry of the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(_) | Self::ServiceUnavailable(_) | Self::Timeout(_) => true,
            Self::Api { status, .. } => matches!(*status, 429 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::Authentication(_) | Self::ResponseDecode { .. }
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
