// ABOUTME: Activity lap resource; listed through the activity, attributes only
// ABOUTME: Laps have no detail endpoint of their own
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use strava_graph_core::{GraphError, GraphResult};

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Resource};

const FIELDS: &[Field] = &[
    Field::new("name", FieldKind::Text),
    Field::new("activity", FieldKind::Json),
    Field::new("athlete", FieldKind::Json),
    Field::new("elapsed_time", FieldKind::Integer),
    Field::new("moving_time", FieldKind::Integer),
    Field::new("start_date", FieldKind::Timestamp),
    Field::new("start_date_local", FieldKind::Timestamp),
    Field::new("distance", FieldKind::Float),
    Field::new("start_index", FieldKind::Integer),
    Field::new("end_index", FieldKind::Integer),
    Field::new("total_elevation_gain", FieldKind::Float),
    Field::new("average_speed", FieldKind::Float),
    Field::new("max_speed", FieldKind::Float),
    Field::new("average_cadence", FieldKind::Float),
    Field::new("average_heartrate", FieldKind::Float),
    Field::new("max_heartrate", FieldKind::Float),
    Field::new("lap_index", FieldKind::Integer),
    Field::new("split", FieldKind::Integer),
    Field::new("pace_zone", FieldKind::Integer),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// One lap of an activity
#[derive(Debug)]
pub struct Lap;

impl Resource for Lap {
    const KIND: &'static str = "lap";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = ();

    fn detail_path(_entity: &Entity<Self>) -> GraphResult<String> {
        Err(GraphError::InvalidOperation {
            operation: "fetch lap details",
            reason: "laps are only listed through their activity",
        })
    }
}
