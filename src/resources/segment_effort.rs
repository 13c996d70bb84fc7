// ABOUTME: Segment effort resource: one athlete's timed pass over a segment
// ABOUTME: The nested segment summary is reconciled into a slot; streams are fetched once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use strava_graph_core::{GraphResult, PayloadObject};

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource};
use crate::reconcile::reconcile_slot;
use crate::resources::{segment, Segment, StreamSet};

/// Streams requested when the caller names none
pub const DEFAULT_STREAM_TYPES: &[&str] = &["time", "distance", "latlng"];

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
    Field::new("average_cadence", FieldKind::Float),
    Field::new("average_watts", FieldKind::Float),
    Field::new("device_watts", FieldKind::Bool),
    Field::new("average_heartrate", FieldKind::Float),
    Field::new("max_heartrate", FieldKind::Float),
    Field::new("kom_rank", FieldKind::Integer),
    Field::new("pr_rank", FieldKind::Integer),
    Field::new("hidden", FieldKind::Bool),
    Field::nested_one("segment", &segment::SCHEMA),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// One attempt at a segment within an activity
#[derive(Debug)]
pub struct SegmentEffort;

/// Related entities of a segment effort
#[derive(Default)]
pub struct SegmentEffortCollections {
    segment: Option<Handle<Segment>>,
    streams: Option<StreamSet>,
}

impl Resource for SegmentEffort {
    const KIND: &'static str = "segment_effort";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = SegmentEffortCollections;

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        Ok(format!("segment_efforts/{}", entity.require_id("fetch segment effort details")?))
    }

    fn absorb(entity: &Entity<Self>, payload: &PayloadObject) -> GraphResult<()> {
        let client = entity.client();
        entity.with_collections(|c| {
            reconcile_slot(&mut c.segment, payload.get("segment"), client, "segment_effort.segment")
        })
    }
}

impl Entity<SegmentEffort> {
    /// Effort name, usually the segment's
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.str_attr("name")
    }

    /// Elapsed time in seconds
    #[must_use]
    pub fn elapsed_time(&self) -> Option<u64> {
        self.u64_attr("elapsed_time")
    }

    /// Segment summary embedded in the payload; never fetches
    #[must_use]
    pub fn segment(&self) -> Option<Handle<Segment>> {
        self.slot(|c| &mut c.segment)
    }

    /// Sample streams; [`DEFAULT_STREAM_TYPES`] when `types` is empty
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn streams(&self, types: &[&str]) -> GraphResult<StreamSet> {
        let base = format!("segment_efforts/{}", self.require_id("read segment effort streams")?);
        let types = if types.is_empty() { DEFAULT_STREAM_TYPES } else { types };
        self.memoised_streams(|c| &mut c.streams, &base, types)
            .await
    }
}
