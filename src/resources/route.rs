// ABOUTME: Saved route resource with its detail endpoint and sample streams
// ABOUTME: Route streams always come back as the full set, so no types are requested
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use strava_graph_core::GraphResult;

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Resource};
use crate::resources::StreamSet;

const FIELDS: &[Field] = &[
    Field::new("name", FieldKind::Text),
    Field::new("description", FieldKind::Text),
    Field::new("athlete", FieldKind::Json),
    Field::new("distance", FieldKind::Float),
    Field::new("elevation_gain", FieldKind::Float),
    Field::new("map", FieldKind::Json),
    Field::renamed("route_type", "type", FieldKind::Integer),
    Field::new("sub_type", FieldKind::Integer),
    Field::new("private", FieldKind::Bool),
    Field::new("starred", FieldKind::Bool),
    Field::new("timestamp", FieldKind::Integer),
    Field::new("estimated_moving_time", FieldKind::Integer),
    Field::new("segments", FieldKind::Json),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// A planned route
#[derive(Debug)]
pub struct Route;

/// Memoised streams of a route
#[derive(Default)]
pub struct RouteCollections {
    streams: Option<StreamSet>,
}

impl Resource for Route {
    const KIND: &'static str = "route";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = RouteCollections;

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        Ok(format!("routes/{}", entity.require_id("fetch route details")?))
    }
}

impl Entity<Route> {
    /// Route name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.str_attr("name")
    }

    /// Planned distance in meters
    #[must_use]
    pub fn distance(&self) -> Option<f64> {
        self.f64_attr("distance")
    }

    /// Route streams, fetched once
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn streams(&self) -> GraphResult<StreamSet> {
        let base = format!("routes/{}", self.require_id("read route streams")?);
        self.memoised_streams(|c| &mut c.streams, &base, &[]).await
    }
}
