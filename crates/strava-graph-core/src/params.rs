// ABOUTME: Ordered request parameters passed from the graph to the transport
// ABOUTME: Unset optional values are dropped rather than sent as empty strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Display;

/// Query or form parameters, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Empty parameter list
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a parameter
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.push(key, value);
        self
    }

    /// Add a parameter only when it has a value
    #[must_use]
    pub fn with_opt<V: Display>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Append a parameter in place
    pub fn push(&mut self, key: impl Into<String>, value: impl Display) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Append every parameter of `other`
    pub fn extend(&mut self, other: &Self) {
        self.0.extend(other.0.iter().cloned());
    }

    /// First value recorded for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether no parameters are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Parameters as key/value pairs, ready for `reqwest` query or form encoding
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_values_are_dropped() {
        let params = Params::new()
            .with_opt("page", Some(2))
            .with_opt::<u32>("per_page", None)
            .with("before", 1_700_000_000);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("per_page"), None);
        assert_eq!(params.pairs()[1].0, "before");
    }
}
