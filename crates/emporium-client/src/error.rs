//! # Client Error Types
//!
//! Error types for everything that happens below the API modules.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │    Response     │  │     Local               │ │
//! │  │  (no body)      │  │  (body present) │  │                         │ │
//! │  │  Transport      │  │  Status         │  │  Config                 │ │
//! │  │  Timeout        │  │  Rejected       │  │  Session                │ │
//! │  │  InvalidUrl     │  │  Decode         │  │  Core (encode/validate) │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Only Status and Rejected carry a body that the failure-message        │
//! │  precedence may read. Everything else yields the fallback message.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;
use thiserror::Error;

use emporium_core::CoreError;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering every failure below the API modules.
///
/// These never reach a store or a view: the API modules fold each one
/// into a failure `ApiResult`.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// No response was received (DNS, refused connection, TLS, reset).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The configured client-side timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// The server answered with a non-2xx status.
    #[error("Server returned HTTP {status}")]
    Status { status: u16, body: Option<Value> },

    /// The server answered 2xx but its payload says `success: false`.
    #[error("Server rejected the request")]
    Rejected(Value),

    /// A 2xx payload did not match the expected record shape.
    #[error("Failed to decode {what}: {reason}")]
    Decode { what: String, reason: String },

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Session store problem.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Encoding or validation failure in the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// Creates a decode error for the named payload.
    pub fn decode(what: impl Into<String>, reason: impl ToString) -> Self {
        ClientError::Decode {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the response body the server sent with this failure, if any.
    ///
    /// Transport failures never have one.
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            ClientError::Status { body, .. } => body.as_ref(),
            ClientError::Rejected(body) => Some(body),
            _ => None,
        }
    }

    /// Returns true if no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Timeout | ClientError::InvalidUrl(_)
        )
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while loading, validating, or saving `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid client configuration: {0}")]
    Invalid(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

// =============================================================================
// Session Errors
// =============================================================================

/// Errors raised by a `SessionStore` write.
///
/// Reads never fail: a missing or corrupt store reads as empty.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session value could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No session path available")]
    NoPath,
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_response_errors_carry_body() {
        let status = ClientError::Status {
            status: 422,
            body: Some(json!({ "detail": "bad" })),
        };
        assert_eq!(status.response_body(), Some(&json!({ "detail": "bad" })));
        assert_eq!(status.status(), Some(422));

        let rejected = ClientError::Rejected(json!({ "success": false }));
        assert!(rejected.response_body().is_some());

        assert!(ClientError::Timeout.response_body().is_none());
        assert!(ClientError::Transport("refused".into()).response_body().is_none());
    }

    #[test]
    fn test_transport_classification() {
        assert!(ClientError::Timeout.is_transport());
        assert!(ClientError::Transport("dns".into()).is_transport());
        assert!(!ClientError::Rejected(json!({})).is_transport());
        assert!(!ClientError::decode("Category", "missing id").is_transport());
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::Status {
            status: 404,
            body: None,
        };
        assert_eq!(err.to_string(), "Server returned HTTP 404");

        let err: ClientError = ConfigError::InvalidUrl("ftp://x".into()).into();
        assert_eq!(err.to_string(), "Invalid API URL: ftp://x");
    }
}
