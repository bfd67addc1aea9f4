//! Error types for the Relay REST client
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the Relay REST client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid or incomplete client configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },

    /// The assembled base URL does not parse
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Protocol / Schema Errors
    // ============================================================================
    /// The server returned pagination metadata the client does not support,
    /// e.g. an absolute continuation URL where only `./`-relative links are
    /// accepted. Fatal to the navigation call that hit it, not to the
    /// already-fetched page.
    #[error("Protocol error: {message}")]
    Protocol {
        /// What the server sent that the client does not support
        message: String,
    },

    /// A raw record could not be materialized into the requested model.
    /// Fatal to the whole fetch; partial pages are never returned.
    #[error("Schema error: {message}")]
    Schema {
        /// How the record diverged from the model
        message: String,
    },

    /// A response body was not valid JSON
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Payload Errors
    // ============================================================================
    /// A payload encoding step could not be undone
    #[error("Failed to decode payload: {message}")]
    Decode {
        /// Which step failed and why
        message: String,
    },

    /// Encryption or decryption failed
    #[error("Cipher error: {message}")]
    Cipher {
        /// What the cipher reported
        message: String,
    },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// The request could not be sent or the response not read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body, when one was readable
        body: String,
    },

    /// The server rejected the request with 429 and retries ran out
    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited {
        /// Server-suggested wait before retrying
        retry_after_seconds: u64,
    },

    /// The request did not complete within the configured timeout
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// The timeout that was exceeded
        timeout_ms: u64,
    },

    /// All retry attempts were exhausted without a definitive response
    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded {
        /// The retry budget that was exhausted
        max_retries: u32,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// A contextualized error from [`ResultExt`]
    #[error("{0}")]
    Other(String),

    /// Any other error
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a cipher error
    pub fn cipher(message: impl Into<String>) -> Self {
        Self::Cipher {
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

    /// Check if this error is retryable at the transport layer
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the Relay REST client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("missing key");
        assert_eq!(err.to_string(), "Configuration error: missing key");

        let err = Error::protocol("absolute URL in Link header");
        assert_eq!(
            err.to_string(),
            "Protocol error: absolute URL in Link header"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RateLimited {
            retry_after_seconds: 60
        }
        .is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(429, "").is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(404, "").is_retryable());
        assert!(!Error::protocol("bad link").is_retryable());
        assert!(!Error::schema("bad record").is_retryable());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
