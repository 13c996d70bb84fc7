// ABOUTME: Activity resource with kudos, comments, photos, related activities, laps and streams
// ABOUTME: Detailed payloads carry segment efforts and gear, reconciled into the activity's caches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde_json::Value;
use strava_graph_core::{CollectionQuery, GraphResult, Params, PayloadObject};
use strava_graph_transport::Method;

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource};
use crate::reconcile::{reconcile_nested, reconcile_slot, CollectionCache};
use crate::resources::{
    gear, segment_effort, Athlete, Comment, Gear, Lap, Photo, SegmentEffort, StreamSet,
};

/// Streams requested when the caller names none
pub const DEFAULT_STREAM_TYPES: &[&str] = &["time", "distance", "latlng"];

const FIELDS: &[Field] = &[
    Field::new("external_id", FieldKind::Text),
    Field::new("upload_id", FieldKind::Integer),
    Field::new("athlete", FieldKind::Json),
    Field::new("name", FieldKind::Text),
    Field::new("description", FieldKind::Text),
    Field::new("distance", FieldKind::Float),
    Field::new("moving_time", FieldKind::Integer),
    Field::new("elapsed_time", FieldKind::Integer),
    Field::new("total_elevation_gain", FieldKind::Float),
    Field::new("elev_high", FieldKind::Float),
    Field::new("elev_low", FieldKind::Float),
    Field::renamed("activity_type", "type", FieldKind::Text),
    Field::new("sport_type", FieldKind::Text),
    Field::new("start_date", FieldKind::Timestamp),
    Field::new("start_date_local", FieldKind::Timestamp),
    Field::new("timezone", FieldKind::Text),
    Field::new("start_latlng", FieldKind::Json),
    Field::new("end_latlng", FieldKind::Json),
    Field::new("location_city", FieldKind::Text),
    Field::new("location_state", FieldKind::Text),
    Field::new("location_country", FieldKind::Text),
    Field::new("achievement_count", FieldKind::Integer),
    Field::new("kudos_count", FieldKind::Integer),
    Field::new("comment_count", FieldKind::Integer),
    Field::new("athlete_count", FieldKind::Integer),
    Field::new("photo_count", FieldKind::Integer),
    Field::new("total_photo_count", FieldKind::Integer),
    Field::new("map", FieldKind::Json),
    Field::new("trainer", FieldKind::Bool),
    Field::new("commute", FieldKind::Bool),
    Field::new("manual", FieldKind::Bool),
    Field::new("private", FieldKind::Bool),
    Field::new("device_name", FieldKind::Text),
    Field::new("embed_token", FieldKind::Text),
    Field::new("flagged", FieldKind::Bool),
    Field::new("workout_type", FieldKind::Integer),
    Field::new("gear_id", FieldKind::Text),
    Field::new("average_speed", FieldKind::Float),
    Field::new("max_speed", FieldKind::Float),
    Field::new("average_cadence", FieldKind::Float),
    Field::new("average_temp", FieldKind::Float),
    Field::new("average_watts", FieldKind::Float),
    Field::new("max_watts", FieldKind::Float),
    Field::new("weighted_average_watts", FieldKind::Float),
    Field::new("kilojoules", FieldKind::Float),
    Field::new("device_watts", FieldKind::Bool),
    Field::new("has_heartrate", FieldKind::Bool),
    Field::new("average_heartrate", FieldKind::Float),
    Field::new("max_heartrate", FieldKind::Float),
    Field::new("calories", FieldKind::Float),
    Field::new("suffer_score", FieldKind::Float),
    Field::new("has_kudoed", FieldKind::Bool),
    Field::new("splits_metric", FieldKind::Json),
    Field::new("splits_standard", FieldKind::Json),
    Field::new("best_efforts", FieldKind::Json),
    Field::renamed("photos_info", "photos", FieldKind::Json),
    Field::renamed("laps_info", "laps", FieldKind::Json),
    Field::nested("segment_efforts", &segment_effort::SCHEMA),
    Field::nested_one("gear", &gear::SCHEMA),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// A recorded activity
#[derive(Debug)]
pub struct Activity;

/// Sub-collections of an activity
#[derive(Default)]
pub struct ActivityCollections {
    kudos: CollectionCache<Athlete>,
    comments: CollectionCache<Comment>,
    photos: CollectionCache<Photo>,
    related: CollectionCache<Activity>,
    laps: CollectionCache<Lap>,
    segment_efforts: CollectionCache<SegmentEffort>,
    gear: Option<Handle<Gear>>,
    streams: Option<StreamSet>,
    zones: Option<Value>,
}

impl Resource for Activity {
    const KIND: &'static str = "activity";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = ActivityCollections;

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        Ok(format!("activities/{}", entity.require_id("fetch activity details")?))
    }

    fn absorb(entity: &Entity<Self>, payload: &PayloadObject) -> GraphResult<()> {
        let client = entity.client();
        entity.with_collections(|c| {
            reconcile_nested(
                &mut c.segment_efforts,
                payload.get("segment_efforts"),
                client,
                "activity.segment_efforts",
            )?;
            reconcile_slot(&mut c.gear, payload.get("gear"), client, "activity.gear")
        })
    }
}

impl Entity<Activity> {
    fn path(&self, suffix: &str) -> GraphResult<String> {
        Ok(format!("activities/{}/{suffix}", self.require_id("read activity collections")?))
    }

    /// Activity name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.str_attr("name")
    }

    /// Distance in meters
    #[must_use]
    pub fn distance(&self) -> Option<f64> {
        self.f64_attr("distance")
    }

    /// Start time
    #[must_use]
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.datetime_attr("start_date")
    }

    /// Athletes who gave kudos
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn kudos(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Athlete>>> {
        let path = self.path("kudos")?;
        self.collection(|c| &mut c.kudos, &path, query).await
    }

    /// Comments on the activity
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn comments(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Comment>>> {
        let path = self.path("comments")?;
        self.collection(|c| &mut c.comments, &path, query).await
    }

    /// Photos from every source
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn photos(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Photo>>> {
        let path = self.path("photos")?;
        let base = Params::new().with("photo_sources", true);
        self.collection_with(|c| &mut c.photos, &path, base, query)
            .await
    }

    /// Activities recorded together with this one
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn related(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Activity>>> {
        let path = self.path("related")?;
        self.collection(|c| &mut c.related, &path, query).await
    }

    /// Laps (not paginated)
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn laps(&self) -> GraphResult<Vec<Handle<Lap>>> {
        let path = self.path("laps")?;
        self.collection(|c| &mut c.laps, &path, &CollectionQuery::all())
            .await
    }

    /// Sample streams; [`DEFAULT_STREAM_TYPES`] when `types` is empty
    ///
    /// Fetched once; later calls return the first result whatever `types` says.
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn streams(&self, types: &[&str]) -> GraphResult<StreamSet> {
        let base = format!("activities/{}", self.require_id("read activity streams")?);
        let types = if types.is_empty() { DEFAULT_STREAM_TYPES } else { types };
        self.memoised_streams(|c| &mut c.streams, &base, types)
            .await
    }

    /// Heart-rate and power zone distribution, fetched once
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn zones(&self) -> GraphResult<Value> {
        let path = self.path("zones")?;
        self.memoised(|c| &mut c.zones, &path).await
    }

    /// Segment efforts from the detailed payload; never fetches
    #[must_use]
    pub fn segment_efforts(&self) -> Vec<Handle<SegmentEffort>> {
        self.cached(|c| &mut c.segment_efforts)
    }

    /// Gear from the detailed payload; never fetches
    #[must_use]
    pub fn gear(&self) -> Option<Handle<Gear>> {
        self.slot(|c| &mut c.gear)
    }

    /// Post a comment as the authenticated athlete
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub async fn comment(&self, text: &str) -> GraphResult<Value> {
        let path = self.path("comments")?;
        self.action(Method::Post, &path, &Params::new().with("text", text))
            .await
    }

    /// Give kudos as the authenticated athlete
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub async fn kudo(&self) -> GraphResult<Value> {
        let path = self.path("kudos")?;
        self.action(Method::Post, &path, &Params::new()).await
    }
}
