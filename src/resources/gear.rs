// ABOUTME: Gear resource (bikes and shoes), summarised on the athlete and detailed at gear/{id}
// ABOUTME: Attributes only; no sub-collections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use strava_graph_core::GraphResult;

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Resource};

const FIELDS: &[Field] = &[
    Field::new("name", FieldKind::Text),
    Field::new("nickname", FieldKind::Text),
    Field::new("primary", FieldKind::Bool),
    Field::new("retired", FieldKind::Bool),
    Field::new("distance", FieldKind::Float),
    Field::new("converted_distance", FieldKind::Float),
    Field::new("brand_name", FieldKind::Text),
    Field::new("model_name", FieldKind::Text),
    Field::new("frame_type", FieldKind::Integer),
    Field::new("description", FieldKind::Text),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// A bike or a pair of shoes
#[derive(Debug)]
pub struct Gear;

impl Resource for Gear {
    const KIND: &'static str = "gear";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = ();

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        Ok(format!("gear/{}", entity.require_id("fetch gear details")?))
    }
}

impl Entity<Gear> {
    /// Display name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.str_attr("name")
    }

    /// Whether this is the athlete's default gear
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.bool_attr("primary").unwrap_or(false)
    }

    /// Accumulated distance in meters
    #[must_use]
    pub fn distance(&self) -> Option<f64> {
        self.f64_attr("distance")
    }
}
