//! Row access and row identity.
//!
//! Rows are opaque JSON records supplied by the host. The engine only ever
//! reads them: cell values are resolved through dotted paths and rows are
//! compared through a [`RowIdentity`], never by position.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Resolves a dotted path (`"owner.address.city"`) against a row.
///
/// Returns `None` as soon as a segment is missing or an intermediate value is
/// not an object. Numeric segments index into arrays (`"tags.0"`).
///
/// # Examples
///
/// ```
/// use complete_table::domain::row::value_at;
/// use serde_json::json;
///
/// let row = json!({ "owner": { "name": "Ada" }, "tags": ["a", "b"] });
/// assert_eq!(value_at(&row, "owner.name"), Some(&json!("Ada")));
/// assert_eq!(value_at(&row, "tags.1"), Some(&json!("b")));
/// assert_eq!(value_at(&row, "owner.email"), None);
/// ```
#[must_use]
pub fn value_at<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(row, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Returns `true` for values that carry no information for detection or display.
///
/// Null and the empty string are blank. Whitespace-only strings are not.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Renders a scalar the way a user would type it: strings without quotes,
/// everything else as compact JSON.
#[must_use]
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Stable comparison key for a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RowKey(pub String);

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

const WHOLE_ROW_PREFIX: &str = "row:";

/// Caller-supplied key function. Takes the row only, never its position.
pub type KeyFn = Arc<dyn Fn(&Value) -> RowKey + Send + Sync>;

/// Strategy used to decide whether two rows are "the same row".
///
/// The default compares the `id` field. A row that lacks the field is keyed
/// by its whole serialized content, so two distinct id-less rows never
/// collapse into one selection entry.
#[derive(Clone)]
pub enum RowIdentity {
    /// Compare the value found at this dotted path.
    Field(String),
    /// Compare the keys returned by a caller-supplied function.
    KeyFn(KeyFn),
}

impl Default for RowIdentity {
    fn default() -> Self {
        Self::Field("id".to_string())
    }
}

impl fmt::Debug for RowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(path) => f.debug_tuple("Field").field(path).finish(),
            Self::KeyFn(_) => f.write_str("KeyFn(..)"),
        }
    }
}

impl RowIdentity {
    /// Builds an identity from a key function.
    ///
    /// ```
    /// use complete_table::domain::row::{RowIdentity, RowKey};
    /// use serde_json::json;
    ///
    /// let identity = RowIdentity::from_fn(|row| RowKey(row["email"].to_string()));
    /// assert!(identity.same(&json!({"email": "a@b.c", "n": 1}), &json!({"email": "a@b.c", "n": 2})));
    /// ```
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> RowKey + Send + Sync + 'static,
    {
        Self::KeyFn(Arc::new(f))
    }

    /// Computes the comparison key of a row.
    ///
    /// Field keys are the field's compact JSON, so `1` and `"1"` stay
    /// distinct. Rows lacking the field are keyed by their whole JSON under a
    /// `row:` prefix, which no JSON value starts with.
    #[must_use]
    pub fn key(&self, row: &Value) -> RowKey {
        match self {
            Self::Field(path) => match value_at(row, path) {
                Some(v) if !v.is_null() => RowKey(v.to_string()),
                _ => RowKey(format!("{WHOLE_ROW_PREFIX}{row}")),
            },
            Self::KeyFn(f) => f(row),
        }
    }

    /// Returns `true` when both rows resolve to the same key.
    #[must_use]
    pub fn same(&self, a: &Value, b: &Value) -> bool {
        self.key(a) == self.key(b)
    }
}
