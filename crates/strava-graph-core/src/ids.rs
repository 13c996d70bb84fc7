// ABOUTME: Opaque entity identity as assigned by the API
// ABOUTME: Normalises numeric and string ids (activities vs. gear) into one comparable key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API-assigned identity, stable for the lifetime of the resource
///
/// Most resources use integer ids while gear uses strings such as `b12345`;
/// both are held in their textual form so `42` and `"42"` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an id from its textual form
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extract an id from a JSON value; `None` for null, empty strings and
    /// non-scalar values
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            _ => None,
        }
    }

    /// Textual form, as used in URL paths
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form, when the id is an integer
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids_compare_equal() {
        assert_eq!(EntityId::from_value(&json!(42)), Some(EntityId::from(42)));
        assert_eq!(EntityId::from_value(&json!("42")), Some(EntityId::from(42)));
    }

    #[test]
    fn test_gear_ids_are_strings() {
        let id = EntityId::from_value(&json!("b12345")).unwrap_or_else(|| EntityId::new(""));
        assert_eq!(id.as_str(), "b12345");
        assert_eq!(id.as_u64(), None);
    }

    #[test]
    fn test_missing_ids() {
        assert_eq!(EntityId::from_value(&Value::Null), None);
        assert_eq!(EntityId::from_value(&json!("")), None);
        assert_eq!(EntityId::from_value(&json!({"id": 1})), None);
    }
}
