// ABOUTME: Classification of raw response bodies into reconcilable payload shapes
// ABOUTME: Rejects scalars and mixed lists up front so caches are never partially updated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::{Map, Value};

use crate::errors::{GraphError, GraphResult};

/// A single structured object from the API
pub type PayloadObject = Map<String, Value>;

/// Shape description used in data-shape errors
const EXPECTED_SHAPE: &str = "object or list of objects";

/// A response body the reconciler knows how to merge
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `[]` or `{}`; reconciles to nothing
    Empty,
    /// One structured object
    Object(PayloadObject),
    /// Ordered sequence of structured objects
    List(Vec<PayloadObject>),
}

impl Payload {
    /// Classify a raw value
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DataShape`] for scalars, `null`, and lists that
    /// contain anything other than objects.
    pub fn classify(value: Value, context: &str) -> GraphResult<Self> {
        match value {
            Value::Object(map) if map.is_empty() => Ok(Self::Empty),
            Value::Object(map) => Ok(Self::Object(map)),
            Value::Array(items) if items.is_empty() => Ok(Self::Empty),
            Value::Array(items) => {
                let mut objects = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(map) => objects.push(map),
                        other => {
                            return Err(GraphError::data_shape(
                                context,
                                EXPECTED_SHAPE,
                                list_element_shape(&other),
                            ))
                        }
                    }
                }
                Ok(Self::List(objects))
            }
            other => Err(GraphError::data_shape(
                context,
                EXPECTED_SHAPE,
                shape_name(&other),
            )),
        }
    }

    /// Classify an optional nested value; absent or `null` yields `None`
    ///
    /// # Errors
    ///
    /// Same as [`Payload::classify`] for present, non-null values.
    pub fn nested(value: Option<&Value>, context: &str) -> GraphResult<Option<Self>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(v) => Self::classify(v.clone(), context).map(Some),
        }
    }

    /// Whether the payload reconciles to nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Number of objects carried
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Object(_) => 1,
            Self::List(items) => items.len(),
        }
    }

    /// Flatten into objects in payload order
    #[must_use]
    pub fn into_objects(self) -> Vec<PayloadObject> {
        match self {
            Self::Empty => Vec::new(),
            Self::Object(map) => vec![map],
            Self::List(items) => items,
        }
    }

    /// Borrow the objects in payload order
    #[must_use]
    pub fn objects(&self) -> Vec<&PayloadObject> {
        match self {
            Self::Empty => Vec::new(),
            Self::Object(map) => vec![map],
            Self::List(items) => items.iter().collect(),
        }
    }
}

/// Short name of a JSON value's shape
#[must_use]
pub const fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

const fn list_element_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "list containing null",
        Value::Bool(_) => "list containing boolean",
        Value::Number(_) => "list containing number",
        Value::String(_) => "list containing string",
        Value::Array(_) => "list containing list",
        Value::Object(_) => "list containing object",
    }
}
