// ABOUTME: Segment resource with efforts, a memoised leaderboard, streams and starring
// ABOUTME: Segment explorer lists popular segments inside a bounding box
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::{Map, Value};
use strava_graph_core::constants::api::DEFAULT_EXPLORER_BOUNDS;
use strava_graph_core::{CollectionQuery, Fidelity, GraphResult, Params};
use strava_graph_transport::{ClientRef, Method};

use crate::entity::schema::{expect_object, Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource, Seed};
use crate::reconcile::CollectionCache;
use crate::resources::{fresh_list, Leaderboard, LeaderboardContext, SegmentEffort, StreamSet};

/// Streams requested when the caller names none
pub const DEFAULT_STREAM_TYPES: &[&str] = &["distance", "altitude", "latlng"];

const FIELDS: &[Field] = &[
    Field::new("name", FieldKind::Text),
    Field::new("activity_type", FieldKind::Text),
    Field::new("distance", FieldKind::Float),
    Field::new("average_grade", FieldKind::Float),
    Field::new("maximum_grade", FieldKind::Float),
    Field::new("avg_grade", FieldKind::Float),
    Field::new("elev_difference", FieldKind::Float),
    Field::new("elevation_high", FieldKind::Float),
    Field::new("elevation_low", FieldKind::Float),
    Field::new("start_latlng", FieldKind::Json),
    Field::new("end_latlng", FieldKind::Json),
    Field::new("climb_category", FieldKind::Integer),
    Field::new("climb_category_desc", FieldKind::Text),
    Field::new("city", FieldKind::Text),
    Field::new("state", FieldKind::Text),
    Field::new("country", FieldKind::Text),
    Field::new("private", FieldKind::Bool),
    Field::new("hazardous", FieldKind::Bool),
    Field::new("starred", FieldKind::Bool),
    Field::new("created_at", FieldKind::Timestamp),
    Field::new("updated_at", FieldKind::Timestamp),
    Field::new("total_elevation_gain", FieldKind::Float),
    Field::new("map", FieldKind::Json),
    Field::new("points", FieldKind::Text),
    Field::new("effort_count", FieldKind::Integer),
    Field::new("athlete_count", FieldKind::Integer),
    Field::new("star_count", FieldKind::Integer),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// A stretch of road or trail efforts are timed on
#[derive(Debug)]
pub struct Segment;

/// Sub-collections of a segment
#[derive(Default)]
pub struct SegmentCollections {
    efforts: CollectionCache<SegmentEffort>,
    leaderboard: Option<Handle<Leaderboard>>,
    streams: Option<StreamSet>,
}

impl Resource for Segment {
    const KIND: &'static str = "segment";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = SegmentCollections;

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        Ok(format!("segments/{}", entity.require_id("fetch segment details")?))
    }
}

impl Segment {
    /// Popular segments inside `bounds`, a `sw.lat,sw.lng,ne.lat,ne.lng` box
    ///
    /// Results are fresh summary entities not owned by any cache.
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn explorer(client: &ClientRef, bounds: Option<&str>) -> GraphResult<Vec<Handle<Self>>> {
        let params = Params::new().with("bounds", bounds.unwrap_or(DEFAULT_EXPLORER_BOUNDS));
        let value = client.get("segments/explore", &params).await?;
        let body = match value {
            Value::Array(ref items) if items.is_empty() => Map::new(),
            other => expect_object(other, "segments/explore")?,
        };
        fresh_list(client, body.get("segments"), "segments/explore.segments")
    }
}

impl Entity<Segment> {
    fn path(&self, suffix: &str) -> GraphResult<String> {
        Ok(format!("segments/{}/{suffix}", self.require_id("read segment collections")?))
    }

    /// Segment name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.str_attr("name")
    }

    /// All efforts on the segment; filters such as `athlete_id`,
    /// `start_date_local` and `end_date_local` are passed through
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn efforts(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<SegmentEffort>>> {
        let path = self.path("all_efforts")?;
        self.collection(|c| &mut c.efforts, &path, query).await
    }

    /// Leaderboard of the segment, created once and kept
    ///
    /// The returned leaderboard is `meta` until
    /// `get_standings` or
    /// `ensure_detailed` is called on it.
    ///
    /// # Errors
    ///
    /// `GraphError::InvalidOperation` when the segment has no id.
    pub fn leaderboard(&self) -> GraphResult<Handle<Leaderboard>> {
        if let Some(existing) = self.slot(|c| &mut c.leaderboard) {
            return Ok(existing);
        }
        let context = LeaderboardContext {
            segment_id: Some(self.require_id("open segment leaderboard")?.clone()),
        };
        let leaderboard = Entity::construct_with(
            Seed::Payload(Map::new()),
            self.client().clone(),
            Fidelity::Meta,
            context,
        )?;
        self.with_collections(|c| c.leaderboard = Some(leaderboard.clone()));
        Ok(leaderboard)
    }

    /// Sample streams; [`DEFAULT_STREAM_TYPES`] when `types` is empty
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn streams(&self, types: &[&str]) -> GraphResult<StreamSet> {
        let base = format!("segments/{}", self.require_id("read segment streams")?);
        let types = if types.is_empty() { DEFAULT_STREAM_TYPES } else { types };
        self.memoised_streams(|c| &mut c.streams, &base, types)
            .await
    }

    /// Star the segment for the authenticated athlete
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub async fn star(&self) -> GraphResult<Value> {
        self.set_starred(true).await
    }

    /// Remove the star
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub async fn unstar(&self) -> GraphResult<Value> {
        self.set_starred(false).await
    }

    async fn set_starred(&self, starred: bool) -> GraphResult<Value> {
        let path = self.path("starred")?;
        self.action(Method::Put, &path, &Params::new().with("star", starred))
            .await
    }
}
