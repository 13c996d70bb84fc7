// ABOUTME: Running race resource and the yearly race listing
// ABOUTME: Listed races are fresh summary entities owned by no cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Datelike, Utc};
use strava_graph_core::{GraphResult, Params};
use strava_graph_transport::ClientRef;
use tracing::debug;

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource};
use crate::resources::fresh_list;

const FIELDS: &[Field] = &[
    Field::new("name", FieldKind::Text),
    Field::new("start_date_local", FieldKind::Timestamp),
    Field::new("distance", FieldKind::Float),
    Field::new("city", FieldKind::Text),
    Field::new("state", FieldKind::Text),
    Field::new("country", FieldKind::Text),
    Field::new("measurement_preference", FieldKind::Text),
    Field::new("running_race_type", FieldKind::Integer),
    Field::new("url", FieldKind::Text),
    Field::new("status", FieldKind::Integer),
    Field::new("website_url", FieldKind::Text),
    Field::new("route_ids", FieldKind::Json),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// An organised running race
#[derive(Debug)]
pub struct RunningRace;

impl Resource for RunningRace {
    const KIND: &'static str = "running_race";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = ();

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        Ok(format!("running_races/{}", entity.require_id("fetch running race details")?))
    }
}

impl RunningRace {
    /// Races of `year`, the current year when `None`
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn list_races(client: &ClientRef, year: Option<i32>) -> GraphResult<Vec<Handle<Self>>> {
        let year = year.unwrap_or_else(|| Utc::now().year());
        debug!("Listing running races for {year}");
        let value = client
            .get("running_races", &Params::new().with("year", year))
            .await?;
        fresh_list(client, Some(&value), "running_races")
    }
}

impl Entity<RunningRace> {
    /// Race name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.str_attr("name")
    }

    /// Race distance in meters
    #[must_use]
    pub fn distance(&self) -> Option<f64> {
        self.f64_attr("distance")
    }

    /// Local start time
    #[must_use]
    pub fn start_date_local(&self) -> Option<DateTime<Utc>> {
        self.datetime_attr("start_date_local")
    }
}
