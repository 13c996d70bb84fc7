// ABOUTME: Declarative per-resource field schema and the shared payload projection routine
// ABOUTME: Identity keys, typed field kinds, nested-payload validation and typed attribute getters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Resource schemas.
//!
//! Each resource declares a [`Schema`] constant. The schema is the single place
//! that knows which payload keys identify an entity, which keys are projected
//! into typed [`Attributes`], and which keys carry nested resources that must
//! be shape-checked before anything is mutated.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use strava_graph_core::payload::shape_name;
use strava_graph_core::{EntityId, GraphError, GraphResult, Payload, PayloadObject};

/// How a payload value is projected
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// String value
    Text,
    /// Signed integer
    Integer,
    /// Floating point number (integers widen)
    Float,
    /// Boolean flag
    Bool,
    /// RFC 3339 timestamp
    Timestamp,
    /// Arbitrary JSON kept verbatim (maps, polylines, lat/lng pairs)
    Json,
    /// Nested resource list (object or list of objects) described by another schema
    Nested(&'static Schema),
    /// Nested single resource object described by another schema
    NestedOne(&'static Schema),
}

/// One declared attribute
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Attribute name exposed on the entity
    pub name: &'static str,
    /// Payload key the value is read from
    pub key: &'static str,
    /// Projection applied to the value
    pub kind: FieldKind,
}

impl Field {
    /// Field whose attribute name equals its payload key
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            key: name,
            kind,
        }
    }

    /// Field exposed under a different name than its payload key
    #[must_use]
    pub const fn renamed(name: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self { name, key, kind }
    }

    /// Nested resource list field
    #[must_use]
    pub const fn nested(name: &'static str, schema: &'static Schema) -> Self {
        Self::new(name, FieldKind::Nested(schema))
    }

    /// Nested single resource field
    #[must_use]
    pub const fn nested_one(name: &'static str, schema: &'static Schema) -> Self {
        Self::new(name, FieldKind::NestedOne(schema))
    }
}

/// Identity keys plus declared fields of a resource
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Payload keys tried in order to obtain the entity id
    pub identity: &'static [&'static str],
    /// Declared attributes
    pub fields: &'static [Field],
}

impl Schema {
    /// Schema keyed by `"id"`
    #[must_use]
    pub const fn keyed_by_id(fields: &'static [Field]) -> Self {
        Self {
            identity: &["id"],
            fields,
        }
    }

    /// Identity of a payload: the first identity key holding a usable id
    #[must_use]
    pub fn identity_of(&self, payload: &PayloadObject) -> Option<EntityId> {
        self.identity
            .iter()
            .find_map(|key| payload.get(*key).and_then(EntityId::from_value))
    }

    /// Check every nested field, recursively, without mutating anything
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DataShape`] naming the offending nested key.
    pub fn validate(&self, payload: &PayloadObject, context: &str) -> GraphResult<()> {
        for field in self.fields {
            let (schema, single) = match field.kind {
                FieldKind::Nested(schema) => (schema, false),
                FieldKind::NestedOne(schema) => (schema, true),
                _ => continue,
            };
            let nested_context = format!("{context}.{}", field.key);
            match Payload::nested(payload.get(field.key), &nested_context)? {
                Some(Payload::List(_)) if single => {
                    return Err(GraphError::data_shape(nested_context, "object", "list"));
                }
                Some(nested) => {
                    for object in nested.objects() {
                        schema.validate(object, &nested_context)?;
                    }
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Project a raw payload into typed attributes
    ///
    /// Absent and `null` values are skipped. A value whose JSON type does not
    /// match the declared kind is kept as [`AttrValue::Json`] rather than dropped.
    #[must_use]
    pub fn project(&self, payload: &PayloadObject) -> Attributes {
        let mut values = BTreeMap::new();
        for field in self.fields {
            match payload.get(field.key) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    values.insert(field.name, AttrValue::project(field.kind, value));
                }
            }
        }
        Attributes(values)
    }
}

/// A projected attribute value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// String value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Parsed timestamp
    Timestamp(DateTime<Utc>),
    /// Verbatim JSON
    Json(Value),
}

impl AttrValue {
    fn project(kind: FieldKind, value: &Value) -> Self {
        match (kind, value) {
            (FieldKind::Text, Value::String(s)) => Self::Text(s.clone()),
            (FieldKind::Integer, Value::Number(n)) => {
                n.as_i64().map_or_else(|| Self::Json(value.clone()), Self::Integer)
            }
            (FieldKind::Float, Value::Number(n)) => {
                n.as_f64().map_or_else(|| Self::Json(value.clone()), Self::Float)
            }
            (FieldKind::Bool, Value::Bool(b)) => Self::Bool(*b),
            (FieldKind::Timestamp, Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .map_or_else(|_| Self::Text(s.clone()), |dt| Self::Timestamp(dt.with_timezone(&Utc))),
            _ => Self::Json(value.clone()),
        }
    }

    /// Name of the projected JSON shape, for diagnostics
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Text(_) | Self::Timestamp(_) => "string",
            Self::Integer(_) | Self::Float(_) => "number",
            Self::Bool(_) => "boolean",
            Self::Json(v) => shape_name(v),
        }
    }
}

/// Typed projection of an entity's raw payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attributes(BTreeMap<&'static str, AttrValue>);

impl Attributes {
    /// Raw projected value
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// String attribute
    #[must_use]
    pub fn str_attr(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric attribute as `f64`
    #[must_use]
    pub fn f64_attr(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            AttrValue::Float(f) => Some(*f),
            AttrValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Non-negative integer attribute
    #[must_use]
    pub fn u64_attr(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            AttrValue::Integer(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Boolean attribute
    #[must_use]
    pub fn bool_attr(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Timestamp attribute
    #[must_use]
    pub fn datetime_attr(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.get(name)? {
            AttrValue::Timestamp(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Attribute names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Number of projected attributes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was projected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Shape description used when a detail fetch does not return one object
pub(crate) fn expect_object(value: Value, context: &str) -> GraphResult<PayloadObject> {
    match value {
        Value::Object(map) if !map.is_empty() => Ok(map),
        Value::Object(_) => Err(GraphError::data_shape(context, "object", "empty object")),
        other => Err(GraphError::data_shape(context, "object", shape_name(&other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CHILD_FIELDS: &[Field] = &[Field::new("name", FieldKind::Text)];
    const CHILD: Schema = Schema::keyed_by_id(CHILD_FIELDS);
    const PARENT_FIELDS: &[Field] = &[
        Field::new("name", FieldKind::Text),
        Field::new("distance", FieldKind::Float),
        Field::new("kudos_count", FieldKind::Integer),
        Field::new("private", FieldKind::Bool),
        Field::new("start_date", FieldKind::Timestamp),
        Field::renamed("activity_type", "type", FieldKind::Text),
        Field::nested("children", &CHILD),
        Field::nested_one("parent", &CHILD),
    ];
    const PARENT: Schema = Schema::keyed_by_id(PARENT_FIELDS);

    fn object(value: Value) -> PayloadObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_projection_types_values() {
        let attrs = PARENT.project(&object(json!({
            "id": 1,
            "name": "Morning Ride",
            "distance": 1000,
            "kudos_count": 4,
            "private": false,
            "start_date": "2018-02-16T14:52:54Z",
            "type": "Ride",
            "unknown": "ignored",
        })));
        assert_eq!(attrs.str_attr("name"), Some("Morning Ride"));
        assert_eq!(attrs.f64_attr("distance"), Some(1000.0));
        assert_eq!(attrs.u64_attr("kudos_count"), Some(4));
        assert_eq!(attrs.bool_attr("private"), Some(false));
        assert!(attrs.datetime_attr("start_date").is_some());
        assert_eq!(attrs.str_attr("activity_type"), Some("Ride"));
        assert!(attrs.get("unknown").is_none());
    }

    #[test]
    fn test_mismatched_kind_kept_as_json() {
        let attrs = PARENT.project(&object(json!({"distance": "far", "start_date": "yesterday"})));
        assert_eq!(attrs.get("distance"), Some(&AttrValue::Json(json!("far"))));
        assert_eq!(attrs.str_attr("start_date"), Some("yesterday"));
    }

    #[test]
    fn test_identity_falls_through_keys() {
        const PHOTO: Schema = Schema {
            identity: &["unique_id", "id"],
            fields: &[],
        };
        assert_eq!(
            PHOTO.identity_of(&object(json!({"unique_id": "a-b", "id": 3}))),
            Some(EntityId::from("a-b"))
        );
        assert_eq!(
            PHOTO.identity_of(&object(json!({"unique_id": null, "id": 3}))),
            Some(EntityId::from(3))
        );
        assert_eq!(PHOTO.identity_of(&object(json!({}))), None);
    }

    #[test]
    fn test_validate_rejects_bad_nested_shapes() {
        assert!(PARENT
            .validate(&object(json!({"children": [{"id": 1}]})), "parent")
            .is_ok());
        assert!(PARENT.validate(&object(json!({"children": null})), "parent").is_ok());

        let err = PARENT
            .validate(&object(json!({"children": [1, 2]})), "parent")
            .unwrap_err();
        assert!(matches!(err, GraphError::DataShape { ref context, .. } if context == "parent.children"));

        let err = PARENT
            .validate(&object(json!({"parent": [{"id": 1}]})), "child")
            .unwrap_err();
        assert!(matches!(err, GraphError::DataShape { found: "list", .. }));
    }

    #[test]
    fn test_expect_object() {
        assert!(expect_object(json!({"id": 1}), "x").is_ok());
        assert!(expect_object(json!({}), "x").is_err());
        assert!(expect_object(json!([{"id": 1}]), "x").is_err());
    }
}
