//! # Result Envelope
//!
//! The uniform `{success, data, message}` shape returned by every API
//! function and every store action.
//!
//! ## Failure Message Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where a failure message comes from                   │
//! │                                                                         │
//! │  No response at all (timeout, DNS, refused)                            │
//! │       └──► per-operation fallback, body never inspected                │
//! │                                                                         │
//! │  Response body present                                                  │
//! │       │                                                                 │
//! │       ├── detail: [{loc, msg}, ...]                                    │
//! │       │      └──► "body.category_name: field required, ..."            │
//! │       │                                                                 │
//! │       ├── detail: "Category already exists"                            │
//! │       │      └──► used verbatim                                         │
//! │       │                                                                 │
//! │       ├── message: "..." (backend's own {success:false} shape)         │
//! │       │      └──► used verbatim                                         │
//! │       │                                                                 │
//! │       └── anything else ──► per-operation fallback                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! `success == true` means `data` holds the payload the caller asked for.
//! `success == false` means `data` holds the documented fallback (`[]` for
//! lists, `None` for single records) and `message` is a non-empty string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// ApiResult
// =============================================================================

/// Uniform result envelope.
///
/// ## Serialization
/// ```json
/// { "success": false, "data": [], "message": "Failed to fetch categories" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    /// True only if the call completed and the server reported success.
    pub success: bool,

    /// The unwrapped payload, or the documented fallback on failure.
    pub data: T,

    /// Human-readable message; always present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResult<T> {
    /// Creates a successful result.
    pub fn ok(data: T) -> Self {
        ApiResult {
            success: true,
            data,
            message: None,
        }
    }

    /// Creates a successful result that also carries a server message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        ApiResult {
            success: true,
            data,
            message: Some(message.into()),
        }
    }

    /// Creates a failure whose fallback data is not `Default`.
    ///
    /// An empty message is never stored; it becomes `"Request failed"`.
    pub fn failure_with(data: T, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Request failed".to_string()
        } else {
            message
        };
        ApiResult {
            success: false,
            data,
            message: Some(message),
        }
    }

    /// Returns true if the call succeeded.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Maps the payload while keeping success flag and message.
    pub fn map<U, F>(self, f: F) -> ApiResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResult {
            success: self.success,
            data: f(self.data),
            message: self.message,
        }
    }

    /// Converts into a plain `Result`, dropping the fallback data on failure.
    pub fn into_result(self) -> Result<T, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .message
                .unwrap_or_else(|| "Request failed".to_string()))
        }
    }
}

impl<T: Default> ApiResult<T> {
    /// Creates a failure with the type's default as fallback data.
    ///
    /// `Vec<T>` falls back to `[]`, `Option<T>` to `None`.
    pub fn failure(message: impl Into<String>) -> Self {
        ApiResult::failure_with(T::default(), message)
    }
}

// =============================================================================
// Failure Normalization
// =============================================================================

/// Derives a failure message from an optional response body.
///
/// Pass `None` when no response was received; the fallback is returned
/// without looking anything up.
///
/// ## Example
/// ```rust
/// use emporium_core::envelope::normalize_failure;
/// use serde_json::json;
///
/// let body = json!({ "detail": "Category already exists" });
/// assert_eq!(normalize_failure(Some(&body), "Failed"), "Category already exists");
/// assert_eq!(normalize_failure(None, "Failed to fetch categories"), "Failed to fetch categories");
/// ```
pub fn normalize_failure(body: Option<&Value>, fallback: &str) -> String {
    if let Some(body) = body {
        if let Some(message) = detail_message(body) {
            return message;
        }

        if let Some(message) = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
        {
            return message.to_string();
        }
    }

    fallback.to_string()
}

/// Reads the `detail` field as either a validation array or a plain string.
fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Array(errors) => {
            let parts: Vec<String> = errors.iter().filter_map(format_field_error).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        _ => None,
    }
}

/// Formats one `{loc, msg}` entry as `"a.b.c: msg"`.
fn format_field_error(error: &Value) -> Option<String> {
    let msg = error.get("msg")?.as_str()?;

    let path: Vec<String> = error
        .get("loc")
        .and_then(Value::as_array)
        .map(|loc| {
            loc.iter()
                .filter_map(|segment| match segment {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if path.is_empty() {
        Some(msg.to_string())
    } else {
        Some(format!("{}: {}", path.join("."), msg))
    }
}

// =============================================================================
// Server Envelope Unwrapping
// =============================================================================

/// Result of reading a 2xx response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerPayload {
    /// The server reported success; holds the unwrapped payload.
    Accepted {
        data: Value,
        message: Option<String>,
    },

    /// The server answered 2xx but its own payload says `success: false`.
    /// Holds the whole body so the caller can normalize it.
    Rejected(Value),
}

/// Unwraps the backend's `{success, data, message}` envelope.
///
/// ## Tolerated Shapes
/// ```text
/// { "success": true, "data": X }   ──► Accepted(X)
/// { "success": true }              ──► Accepted(null)
/// { "success": false, ... }        ──► Rejected(body)
/// { "data": X }                    ──► Accepted(X)
/// [ ... ] or { ...no wrapper... }  ──► Accepted(body)   (bare payload)
/// ```
pub fn unwrap_server_envelope(body: Value) -> ServerPayload {
    let mut map = match body {
        Value::Object(map) => map,
        other => {
            return ServerPayload::Accepted {
                data: other,
                message: None,
            }
        }
    };

    let message = map
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string);

    match map.get("success") {
        Some(Value::Bool(false)) => ServerPayload::Rejected(Value::Object(map)),
        Some(_) => ServerPayload::Accepted {
            data: map.remove("data").unwrap_or(Value::Null),
            message,
        },
        None => match map.remove("data") {
            Some(data) => ServerPayload::Accepted { data, message },
            None => ServerPayload::Accepted {
                data: Value::Object(map),
                message: None,
            },
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
