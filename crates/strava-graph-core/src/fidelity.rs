// ABOUTME: Three-level fidelity state shared by all entities (meta < summary < detailed)
// ABOUTME: Maps the API resource_state wire value and only ever advances forward
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::payload_keys;

/// How much of an entity's data is currently held
///
/// Ordered `Meta < Summary < Detailed`; the derived `Ord` follows declaration
/// order, which is the order transitions are allowed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fidelity {
    /// Identity only
    Meta,
    /// Fields returned by list endpoints
    Summary,
    /// Full single-entity fields
    Detailed,
}

impl Fidelity {
    /// Decode the API `resource_state` value
    #[must_use]
    pub const fn from_resource_state(state: u64) -> Option<Self> {
        match state {
            1 => Some(Self::Meta),
            2 => Some(Self::Summary),
            3 => Some(Self::Detailed),
            _ => None,
        }
    }

    /// Encode as the API `resource_state` value
    #[must_use]
    pub const fn resource_state(self) -> u8 {
        match self {
            Self::Meta => 1,
            Self::Summary => 2,
            Self::Detailed => 3,
        }
    }

    /// Read the fidelity a payload declares about itself, if any
    #[must_use]
    pub fn declared_by(payload: &serde_json::Map<String, Value>) -> Option<Self> {
        payload
            .get(payload_keys::RESOURCE_STATE)
            .and_then(Value::as_u64)
            .and_then(Self::from_resource_state)
    }

    /// Next state after observing `incoming`; never moves backwards
    #[must_use]
    pub fn advance(self, incoming: Self) -> Self {
        self.max(incoming)
    }

    /// Lowercase name (`meta`, `summary`, `detailed`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::Summary => "summary",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for Fidelity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
