//! Error types for the NIH RePORTER MCP server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

use serde_json::{Value, json};

/// Maximum number of raw body characters kept in a decode error.
pub const SNIPPET_LEN: usize = 512;

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Network failure (connection, DNS, TLS, reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-2xx response from RePORTER.
    #[error("Upstream error ({status}): {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// Body was not JSON or did not match the expected envelope.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Parser message
        message: String,
        /// Leading part of the raw body
        snippet: String,
    },

    /// Request body could not be serialized.
    #[error("Failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ClientError {
    /// Create an upstream error.
    #[must_use]
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream { status, body: body.into() }
    }

    /// Create a decode error, keeping at most [`SNIPPET_LEN`] characters of the body.
    #[must_use]
    pub fn decode(message: impl Into<String>, raw_body: &str) -> Self {
        Self::Decode { message: message.into(), snippet: snippet(raw_body) }
    }

    /// Map a middleware error, distinguishing timeouts from other network failures.
    #[must_use]
    pub fn from_middleware(err: reqwest_middleware::Error, timeout: Duration) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => Self::from_reqwest(&e, timeout),
            reqwest_middleware::Error::Middleware(e) => Self::Transport(e.to_string()),
        }
    }

    /// Map a reqwest error.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// Returns true if retrying the same request could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Upstream { status, .. } => *status >= 500,
            Self::Decode { .. } | Self::Serialize(_) => false,
        }
    }

    /// Upstream HTTP status, if the error came from a non-2xx response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short machine-readable kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) | Self::Timeout(_) => "transport_error",
            Self::Upstream { .. } => "upstream_error",
            Self::Decode { .. } => "decode_error",
            Self::Serialize(_) => "internal_error",
        }
    }
}

fn snippet(raw: &str) -> String {
    raw.chars().take(SNIPPET_LEN).collect()
}

/// Errors from MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Error from the API client
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Failed to serialize tool output
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Name of the offending field for validation errors.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Short machine-readable kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Client(e) => e.kind(),
            Self::Validation { .. } => "validation_error",
            Self::Serialization(_) => "internal_error",
        }
    }

    /// Convert to a user-friendly error message for MCP response.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Client(ClientError::Upstream { status, body }) => {
                format!("NIH RePORTER returned HTTP {status}: {body}")
            }
            Self::Client(ClientError::Timeout(after)) => {
                format!("NIH RePORTER did not respond within {after:?}. Please retry.")
            }
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            Self::Serialization(e) => format!("Failed to render result: {e}"),
            _ => self.to_string(),
        }
    }

    /// Structured error body returned to the tool caller.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut obj = json!({
            "status": "error",
            "kind": self.kind(),
            "message": self.to_user_message(),
        });

        match self {
            Self::Validation { field, .. } => {
                obj["field"] = json!(field);
            }
            Self::Client(ClientError::Upstream { status, body }) => {
                obj["upstream_status"] = json!(status);
                obj["body"] = json!(body);
            }
            Self::Client(ClientError::Decode { snippet, .. }) => {
                obj["body"] = json!(snippet);
            }
            _ => {}
        }

        obj
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_retryable() {
        assert!(ClientError::Transport("reset".into()).is_retryable());
        assert!(ClientError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(ClientError::upstream(503, "unavailable").is_retryable());

        assert!(!ClientError::upstream(400, "bad criteria").is_retryable());
        assert!(!ClientError::decode("expected value", "<html>").is_retryable());
    }

    #[test]
    fn test_decode_snippet_is_bounded() {
        let body = "x".repeat(SNIPPET_LEN * 3);
        match ClientError::decode("expected value", &body) {
            ClientError::Decode { snippet, .. } => assert_eq!(snippet.len(), SNIPPET_LEN),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_tool_error_user_message() {
        let err = ToolError::validation("fiscal_years", "must be between 1985 and 2027");
        assert!(err.to_user_message().contains("fiscal_years"));
        assert_eq!(err.field(), Some("fiscal_years"));
    }

    #[test]
    fn test_upstream_error_json_keeps_body() {
        let err = ToolError::from(ClientError::upstream(500, "Internal Server Error"));
        let body = err.to_json();
        assert_eq!(body["status"], "error");
        assert_eq!(body["kind"], "upstream_error");
        assert_eq!(body["upstream_status"], 500);
        assert_eq!(body["body"], "Internal Server Error");
    }
}
