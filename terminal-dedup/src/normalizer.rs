//! Record field normalization into comparison keys

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How raw field values are folded before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationPolicy {
    /// Compare strings exactly as written (no lower-casing)
    pub case_sensitive: bool,
    /// Trim leading and trailing whitespace from strings
    pub strip_whitespace: bool,
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            strip_whitespace: true,
        }
    }
}

/// Canonical comparison key derived from one record field.
///
/// Keys are plain strings: a string value and a non-string value whose
/// canonical JSON spells the same text (`"1"` and `1`, `"true"` and `true`)
/// fall into the same duplicate group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for NormalizedKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for NormalizedKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a raw field value under `policy`.
///
/// Returns `None` for an absent field or an explicit `null`; such values are
/// never counted as duplicates. Non-string values are serialized with object
/// keys sorted recursively, so `{"a":1,"b":2}` and `{"b":2,"a":1}` produce the
/// same key. This function never fails.
pub fn normalize(value: Option<&Value>, policy: NormalizationPolicy) -> Option<NormalizedKey> {
    match value? {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = if policy.strip_whitespace { s.trim() } else { s.as_str() };
            let folded = if policy.case_sensitive {
                trimmed.to_string()
            } else {
                trimmed.to_lowercase()
            };
            Some(NormalizedKey(folded))
        }
        other => Some(NormalizedKey(canonical_json(other))),
    }
}

fn canonical_json(value: &Value) -> String {
    let sorted = sort_keys(value);
    serde_json::to_string(&sorted).unwrap_or_else(|_| value.to_string())
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_keys(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        scalar => scalar.clone(),
    }
}
