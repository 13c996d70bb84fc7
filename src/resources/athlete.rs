// ABOUTME: Athlete resource: the authenticated athlete and other athletes reached through the graph
// ABOUTME: Activities, social graph, KOMs, routes, starred segments, clubs, gear, stats and zones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Athletes.
//!
//! The API gives reduced access to athletes other than the authenticated one,
//! so several accessors are only available when [`AthleteContext::current`]
//! is set. Calling them on another athlete fails with
//! [`GraphError::InvalidOperation`] before any request is made.

use std::collections::HashMap;

use serde_json::Value;
use strava_graph_core::{
    CollectionQuery, EntityId, Fidelity, GraphError, GraphResult, Params, PayloadObject,
};
use strava_graph_transport::ClientRef;
use tracing::debug;

use crate::entity::schema::{expect_object, Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource, Seed};
use crate::reconcile::{reconcile, reconcile_nested, CollectionCache, Roster};
use crate::resources::{club, gear, Activity, Club, Gear, Route, RunningRace, Segment, SegmentEffort};

const FIELDS: &[Field] = &[
    Field::new("username", FieldKind::Text),
    Field::new("firstname", FieldKind::Text),
    Field::new("lastname", FieldKind::Text),
    Field::new("bio", FieldKind::Text),
    Field::new("city", FieldKind::Text),
    Field::new("state", FieldKind::Text),
    Field::new("country", FieldKind::Text),
    Field::new("sex", FieldKind::Text),
    Field::new("premium", FieldKind::Bool),
    Field::new("summit", FieldKind::Bool),
    Field::new("created_at", FieldKind::Timestamp),
    Field::new("updated_at", FieldKind::Timestamp),
    Field::new("badge_type_id", FieldKind::Integer),
    Field::new("profile_medium", FieldKind::Text),
    Field::new("profile", FieldKind::Text),
    Field::new("friend", FieldKind::Text),
    Field::new("follower", FieldKind::Text),
    Field::new("follower_count", FieldKind::Integer),
    Field::new("friend_count", FieldKind::Integer),
    Field::new("mutual_friend_count", FieldKind::Integer),
    Field::new("athlete_type", FieldKind::Integer),
    Field::new("date_preference", FieldKind::Text),
    Field::new("measurement_preference", FieldKind::Text),
    Field::new("email", FieldKind::Text),
    Field::new("ftp", FieldKind::Integer),
    Field::new("weight", FieldKind::Float),
    Field::nested("bikes", &gear::SCHEMA),
    Field::nested("shoes", &gear::SCHEMA),
    Field::nested("clubs", &club::SCHEMA),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// An athlete
#[derive(Debug)]
pub struct Athlete;

/// Construction context of an athlete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AthleteContext {
    /// Whether this is the athlete the access token belongs to
    pub current: bool,
}

/// Sub-collections of an athlete
#[derive(Default)]
pub struct AthleteCollections {
    activities: CollectionCache<Activity>,
    friends_activities: CollectionCache<Activity>,
    koms: CollectionCache<SegmentEffort>,
    routes: CollectionCache<Route>,
    starred_segments: CollectionCache<Segment>,
    connections: CollectionCache<Athlete>,
    friends: Roster,
    followers: Roster,
    both_following: HashMap<EntityId, Vec<Handle<Athlete>>>,
    gear: CollectionCache<Gear>,
    clubs: CollectionCache<Club>,
    stats: Option<Value>,
    zones: Option<Value>,
}

impl Resource for Athlete {
    const KIND: &'static str = "athlete";
    const SCHEMA: Schema = SCHEMA;
    type Context = AthleteContext;
    type Collections = AthleteCollections;

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        if entity.is_current() {
            Ok("athlete".to_owned())
        } else {
            Ok(format!("athletes/{}", entity.require_id("fetch athlete details")?))
        }
    }

    fn absorb(entity: &Entity<Self>, payload: &PayloadObject) -> GraphResult<()> {
        let client = entity.client();
        entity.with_collections(|c| {
            reconcile_nested(&mut c.gear, payload.get("bikes"), client, "athlete.bikes")?;
            reconcile_nested(&mut c.gear, payload.get("shoes"), client, "athlete.shoes")?;
            reconcile_nested(&mut c.clubs, payload.get("clubs"), client, "athlete.clubs")?;
            Ok(())
        })
    }
}

impl Athlete {
    /// Fetch the authenticated athlete
    ///
    /// # Errors
    ///
    /// Transport errors, including authorization failures, and data-shape errors.
    pub async fn current(client: ClientRef) -> GraphResult<Handle<Self>> {
        let value = client.get("athlete", &Params::new()).await?;
        let payload = expect_object(value, "athlete")?;
        Entity::construct_with(
            Seed::Payload(payload),
            client,
            Fidelity::Detailed,
            AthleteContext { current: true },
        )
    }
}

impl Entity<Athlete> {
    /// Whether this is the authenticated athlete
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.context().current
    }

    fn require_current(&self, operation: &'static str) -> GraphResult<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(GraphError::requires_current_athlete(operation))
        }
    }

    fn own_path(&self, suffix: &str) -> GraphResult<String> {
        Ok(format!("athletes/{}/{suffix}", self.require_id("read athlete collections")?))
    }

    fn scoped_path(&self, suffix: &str) -> GraphResult<String> {
        if self.is_current() {
            Ok(format!("athlete/{suffix}"))
        } else {
            self.own_path(suffix)
        }
    }

    /// First name
    #[must_use]
    pub fn firstname(&self) -> Option<String> {
        self.str_attr("firstname")
    }

    /// Last name
    #[must_use]
    pub fn lastname(&self) -> Option<String> {
        self.str_attr("lastname")
    }

    /// Activities of the authenticated athlete
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidOperation`] on other athletes; transport and data-shape errors.
    pub async fn activities(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Activity>>> {
        self.require_current("list activities")?;
        self.collection(|c| &mut c.activities, "athlete/activities", query)
            .await
    }

    /// Activity feed of followed athletes; `before` is accepted as a filter
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidOperation`] on other athletes; transport and data-shape errors.
    pub async fn friends_activities(
        &self,
        query: &CollectionQuery,
    ) -> GraphResult<Vec<Handle<Activity>>> {
        self.require_current("list friends' activities")?;
        self.collection(|c| &mut c.friends_activities, "activities/following", query)
            .await
    }

    /// Segment efforts holding a KOM or QOM
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn koms(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<SegmentEffort>>> {
        let path = self.own_path("koms")?;
        self.collection(|c| &mut c.koms, &path, query).await
    }

    /// Routes created by the athlete
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn routes(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Route>>> {
        let path = self.own_path("routes")?;
        self.collection(|c| &mut c.routes, &path, query).await
    }

    /// Segments the athlete starred
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn starred_segments(
        &self,
        query: &CollectionQuery,
    ) -> GraphResult<Vec<Handle<Segment>>> {
        let path = if self.is_current() {
            "segments/starred".to_owned()
        } else {
            self.own_path("segments/starred")?
        };
        self.collection(|c| &mut c.starred_segments, &path, query)
            .await
    }

    /// Athletes this athlete follows
    ///
    /// Friends, followers and `both_following` share one identity
    /// map, so an athlete seen through several of them is one entity.
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn friends(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Athlete>>> {
        let path = self.scoped_path("friends")?;
        self.shared_collection(|c| (&mut c.connections, &mut c.friends), &path, query)
            .await
    }

    /// Athletes following this athlete
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn followers(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Athlete>>> {
        let path = self.scoped_path("followers")?;
        self.shared_collection(|c| (&mut c.connections, &mut c.followers), &path, query)
            .await
    }

    /// Athletes both the authenticated athlete and `other` follow
    ///
    /// Results are memoised per `other` id unless `query` is explicit.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidOperation`] on other athletes; transport and data-shape errors.
    pub async fn both_following(
        &self,
        other: &EntityId,
        query: &CollectionQuery,
    ) -> GraphResult<Vec<Handle<Athlete>>> {
        self.require_current("list athletes both following")?;
        let path = format!("athletes/{other}/friends");

        if !query.is_explicit() {
            if let Some(known) = self.with_collections(|c| c.both_following.get(other).cloned()) {
                debug!("{path}: serving {} memoised athletes", known.len());
                return Ok(known);
            }
        }

        let value = self.client().get(&path, &query.to_params()).await?;
        self.with_collections(|c| {
            let handles = reconcile(
                &mut c.connections,
                value,
                self.client(),
                Fidelity::Summary,
                &path,
            )?;
            if !query.is_explicit() {
                c.both_following.insert(other.clone(), handles.clone());
            }
            Ok(handles)
        })
    }

    /// Clubs of the authenticated athlete (not paginated)
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidOperation`] on other athletes; transport and data-shape errors.
    pub async fn clubs(&self) -> GraphResult<Vec<Handle<Club>>> {
        self.require_current("list clubs")?;
        self.collection(|c| &mut c.clubs, "athlete/clubs", &CollectionQuery::all())
            .await
    }

    /// Bikes and shoes from the athlete payload; never fetches
    #[must_use]
    pub fn gear(&self) -> Vec<Handle<Gear>> {
        self.cached(|c| &mut c.gear)
    }

    /// Totals and recent statistics, fetched once
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidOperation`] on other athletes; transport errors.
    pub async fn stats(&self) -> GraphResult<Value> {
        self.require_current("read stats")?;
        let path = self.own_path("stats")?;
        self.memoised(|c| &mut c.stats, &path).await
    }

    /// Alias of `stats`
    ///
    /// # Errors
    ///
    /// See `stats`.
    pub async fn totals(&self) -> GraphResult<Value> {
        self.stats().await
    }

    /// Heart-rate and power zones, fetched once
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidOperation`] on other athletes; transport errors.
    pub async fn zones(&self) -> GraphResult<Value> {
        self.require_current("read zones")?;
        self.memoised(|c| &mut c.zones, "athlete/zones").await
    }

    /// Running races of `year` (current year when `None`)
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn list_races(&self, year: Option<i32>) -> GraphResult<Vec<Handle<RunningRace>>> {
        RunningRace::list_races(self.client(), year).await
    }

    /// Popular segments inside `bounds` (`sw.lat,sw.lng,ne.lat,ne.lng`)
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn segment_explorer(&self, bounds: Option<&str>) -> GraphResult<Vec<Handle<Segment>>> {
        Segment::explorer(self.client(), bounds).await
    }
}
