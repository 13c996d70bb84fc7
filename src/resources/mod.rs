// ABOUTME: Resource kinds of the v3 API and the accessor helpers they share
// ABOUTME: Memoised raw reads, foreign-key resolution, fresh lists and write pass-throughs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Resources
//!
//! One module per API resource kind. Each declares its [`Schema`], its
//! construction context and its sub-collection caches, and implements the
//! accessors of that kind on `Entity<Kind>`.
//!
//! [`Schema`]: crate::entity::schema::Schema

/// Athletes, including the authenticated one
pub mod athlete;
/// Activities
pub mod activity;
/// Clubs
pub mod club;
/// Club announcements
pub mod club_announcement;
/// Activity comments
pub mod comment;
/// Bikes and shoes
pub mod gear;
/// Club group events
pub mod group_event;
/// Activity laps
pub mod lap;
/// Segment leaderboards
pub mod leaderboard;
/// Leaderboard rows
pub mod leaderboard_entry;
/// Activity photos
pub mod photo;
/// Routes
pub mod route;
/// Running races
pub mod running_race;
/// Segments
pub mod segment;
/// Segment efforts
pub mod segment_effort;
/// Stream value objects
pub mod streams;

pub use activity::Activity;
pub use athlete::{Athlete, AthleteContext};
pub use club::Club;
pub use club_announcement::ClubAnnouncement;
pub use comment::Comment;
pub use gear::Gear;
pub use group_event::GroupEvent;
pub use lap::Lap;
pub use leaderboard::{Leaderboard, LeaderboardContext};
pub use leaderboard_entry::LeaderboardEntry;
pub use photo::Photo;
pub use route::Route;
pub use running_race::RunningRace;
pub use segment::Segment;
pub use segment_effort::SegmentEffort;
pub use streams::{Stream, StreamSet};

use serde_json::Value;
use strava_graph_core::{Fidelity, GraphError, GraphResult, Params, Payload};
use strava_graph_transport::{ClientRef, Method};
use tracing::{debug, info};

use crate::entity::{Entity, Handle, Resource, Seed};

/// Picks a memoised raw value out of a parent's collections
pub(crate) type MemoSelect<R> = fn(&mut <R as Resource>::Collections) -> &mut Option<Value>;

/// Picks a memoised stream set out of a parent's collections
pub(crate) type StreamSelect<R> = fn(&mut <R as Resource>::Collections) -> &mut Option<StreamSet>;

/// Picks a single-entity slot out of a parent's collections
pub(crate) type SlotSelect<R, C> = fn(&mut <R as Resource>::Collections) -> &mut Option<Handle<C>>;

/// Construct one uncached entity per object of a response body
///
/// Used by lookups that are not owned by any parent (race listings, segment
/// explorer results).
pub(crate) fn fresh_list<C: Resource>(
    client: &ClientRef,
    value: Option<&Value>,
    context: &str,
) -> GraphResult<Vec<Handle<C>>> {
    let Some(payload) = Payload::nested(value, context)? else {
        return Ok(Vec::new());
    };
    let objects = payload.into_objects();
    for object in &objects {
        C::SCHEMA.validate(object, context)?;
    }
    objects
        .into_iter()
        .map(|object| {
            Entity::from_validated(object, client.clone(), Fidelity::Summary, C::Context::default())
        })
        .collect()
}

impl<R: Resource> Entity<R> {
    /// Fetch a raw, non-entity body once and serve it from memory afterwards
    pub(crate) async fn memoised(&self, select: MemoSelect<R>, path: &str) -> GraphResult<Value> {
        if let Some(value) = self.with_collections(|c| select(c).clone()) {
            debug!("{path}: serving memoised body");
            return Ok(value);
        }
        let value = self.client().get(path, &Params::new()).await?;
        Payload::classify(value.clone(), path)?;
        self.with_collections(|c| *select(c) = Some(value.clone()));
        Ok(value)
    }

    /// Fetch streams once and serve them from memory afterwards
    ///
    /// An empty response is not kept, so the next call fetches again.
    pub(crate) async fn memoised_streams(
        &self,
        select: StreamSelect<R>,
        base: &str,
        types: &[&str],
    ) -> GraphResult<StreamSet> {
        if let Some(set) = self.with_collections(|c| select(c).clone()) {
            return Ok(set);
        }
        let set = streams::fetch(self.client(), base, types, &Params::new()).await?;
        if set.is_empty() {
            debug!("{base}: no streams returned");
        } else {
            self.with_collections(|c| *select(c) = Some(set.clone()));
        }
        Ok(set)
    }

    /// Current content of a single-entity slot
    pub(crate) fn slot<C: Resource>(&self, select: SlotSelect<R, C>) -> Option<Handle<C>> {
        self.with_collections(|c| select(c).clone())
    }

    /// Resolve a foreign-key attribute into a `meta` entity, memoised in `select`
    pub(crate) fn reference<C: Resource>(
        &self,
        select: SlotSelect<R, C>,
        key: &str,
        operation: &'static str,
    ) -> GraphResult<Handle<C>> {
        if let Some(existing) = self.slot(select) {
            return Ok(existing);
        }
        let id = self
            .foreign_key(key)
            .ok_or(GraphError::InvalidOperation {
                operation,
                reason: "the referenced id is not in the payload",
            })?;
        let handle = Entity::construct_with(
            Seed::Id(id),
            self.client().clone(),
            Fidelity::Meta,
            C::Context::default(),
        )?;
        self.with_collections(|c| *select(c) = Some(handle.clone()));
        Ok(handle)
    }

    /// Pass a write straight through to the transport
    pub(crate) async fn action(
        &self,
        method: Method,
        path: &str,
        params: &Params,
    ) -> GraphResult<Value> {
        info!("{method} {path} on {} {:?}", R::KIND, self.id());
        self.client().request(method, path, params).await
    }
}
