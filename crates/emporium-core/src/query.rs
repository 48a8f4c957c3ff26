//! # Query Parameters
//!
//! List endpoints take an optional filter object. Unset filters are
//! omitted entirely rather than sent as empty strings.
//!
//! ## Stripping Rules
//! ```text
//! { search: "", status: null, sort_by: "newest", tags: [] }
//!        │          │                 │              │
//!      empty       null             kept           empty
//!        ▼          ▼                 ▼              ▼
//!     dropped    dropped       sort_by=newest     dropped
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// Ordered list of `key=value` pairs ready to be appended to a URL.
///
/// Keys come out in lexicographic order, which keeps request URLs stable
/// across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds parameters from any serializable filter struct.
    ///
    /// ## Example
    /// ```rust
    /// use emporium_core::QueryParams;
    /// use serde_json::json;
    ///
    /// let params = QueryParams::from_filters(&json!({
    ///     "search": "",
    ///     "status": null,
    ///     "sort_by": "newest"
    /// })).unwrap();
    /// assert_eq!(params.pairs(), &[("sort_by".to_string(), "newest".to_string())]);
    /// ```
    pub fn from_filters<F: Serialize + ?Sized>(filters: &F) -> CoreResult<Self> {
        let value =
            serde_json::to_value(filters).map_err(|e| CoreError::encode("query filters", e))?;
        Self::from_value(value)
    }

    /// Builds parameters from a JSON object. `null` yields no parameters.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(CoreError::encode(
                    "query filters",
                    format!("expected an object, got {}", other),
                ))
            }
        };

        let mut params = Self::new();
        for (key, value) in map {
            match value {
                Value::Array(values) => {
                    for item in values {
                        params.push_value(&key, item);
                    }
                }
                other => params.push_value(&key, other),
            }
        }
        Ok(params)
    }

    /// Appends a parameter, skipping blank values.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.trim().is_empty() {
            self.pairs.push((key.into(), value));
        }
    }

    /// Appends a parameter only when a value is present.
    pub fn push_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.push(key, value.to_string());
        }
    }

    fn push_value(&mut self, key: &str, value: Value) {
        match value {
            Value::Null => {}
            Value::String(s) => self.push(key, s),
            Value::Bool(b) => self.push(key, b.to_string()),
            Value::Number(n) => self.push(key, n.to_string()),
            Value::Array(_) | Value::Object(_) => self.push(key, value.to_string()),
        }
    }

    /// Returns the parameters as `(key, value)` pairs.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Looks up the first value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if no parameter survived stripping.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Filters {
        search: Option<String>,
        status: Option<String>,
        sort_by: Option<String>,
        page: Option<u32>,
    }

    #[test]
    fn test_strips_empty_and_missing_filters() {
        let filters = Filters {
            search: Some(String::new()),
            status: None,
            sort_by: Some("newest".to_string()),
            page: None,
        };
        let params = QueryParams::from_filters(&filters).unwrap();
        assert_eq!(params.pairs(), &[("sort_by".to_string(), "newest".to_string())]);
    }

    #[test]
    fn test_whitespace_only_is_stripped() {
        let params = QueryParams::from_filters(&json!({ "search": "   " })).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_scalars_render_as_strings() {
        let params =
            QueryParams::from_filters(&json!({ "page": 2, "is_active": false, "min": 1.5 }))
                .unwrap();
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("is_active"), Some("false"));
        assert_eq!(params.get("min"), Some("1.5"));
    }

    #[test]
    fn test_arrays_repeat_key() {
        let params = QueryParams::from_filters(&json!({ "role": ["admin", "", "editor"] })).unwrap();
        assert_eq!(
            params.pairs(),
            &[
                ("role".to_string(), "admin".to_string()),
                ("role".to_string(), "editor".to_string())
            ]
        );
    }

    #[test]
    fn test_zero_is_not_stripped() {
        let params = QueryParams::from_filters(&json!({ "category_id": 0 })).unwrap();
        assert_eq!(params.get("category_id"), Some("0"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(QueryParams::from_filters(&json!("search")).is_err());
        assert!(QueryParams::from_filters(&json!(null)).unwrap().is_empty());
    }
}
