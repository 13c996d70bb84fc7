// ABOUTME: Activity photo resource, keyed by unique_id with a fallback to id
// ABOUTME: Photos are only listed through their activity and have no detail endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use strava_graph_core::{GraphError, GraphResult};

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Resource};

const FIELDS: &[Field] = &[
    Field::new("unique_id", FieldKind::Text),
    Field::new("activity_id", FieldKind::Integer),
    Field::renamed("reference", "ref", FieldKind::Text),
    Field::new("uid", FieldKind::Text),
    Field::new("caption", FieldKind::Text),
    Field::renamed("photo_type", "type", FieldKind::Text),
    Field::new("source", FieldKind::Integer),
    Field::new("uploaded_at", FieldKind::Timestamp),
    Field::new("created_at", FieldKind::Timestamp),
    Field::new("created_at_local", FieldKind::Timestamp),
    Field::new("location", FieldKind::Json),
    Field::new("urls", FieldKind::Json),
    Field::new("sizes", FieldKind::Json),
];

pub(crate) const SCHEMA: Schema = Schema {
    identity: &["unique_id", "id"],
    fields: FIELDS,
};

/// A photo attached to an activity
#[derive(Debug)]
pub struct Photo;

impl Resource for Photo {
    const KIND: &'static str = "photo";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = ();

    fn detail_path(_entity: &Entity<Self>) -> GraphResult<String> {
        Err(GraphError::InvalidOperation {
            operation: "fetch photo details",
            reason: "photos are only listed through their activity",
        })
    }
}

impl Entity<Photo> {
    /// Caption
    #[must_use]
    pub fn caption(&self) -> Option<String> {
        self.str_attr("caption")
    }
}
