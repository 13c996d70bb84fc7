// ABOUTME: Segment leaderboard: an id-less entity keyed by its parent segment
// ABOUTME: Standings pages are merged into one entry cache keyed by effort_id and sorted by rank
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use strava_graph_core::{
    CollectionQuery, EntityId, Fidelity, GraphError, GraphResult, Payload, PayloadObject,
};

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource};
use crate::reconcile::{reconcile_nested, CollectionCache};
use crate::resources::{leaderboard_entry, LeaderboardEntry};

const FIELDS: &[Field] = &[
    Field::new("segment_id", FieldKind::Integer),
    Field::new("entry_count", FieldKind::Integer),
    Field::new("effort_count", FieldKind::Integer),
    Field::new("kom_type", FieldKind::Text),
    Field::nested("entries", &leaderboard_entry::SCHEMA),
];

pub(crate) const SCHEMA: Schema = Schema {
    identity: &[],
    fields: FIELDS,
};

/// Ranked efforts on one segment
#[derive(Debug)]
pub struct Leaderboard;

/// The segment a leaderboard belongs to
#[derive(Debug, Clone, Default)]
pub struct LeaderboardContext {
    /// Parent segment id
    pub segment_id: Option<EntityId>,
}

/// Entry cache of a leaderboard
#[derive(Default)]
pub struct LeaderboardCollections {
    entries: CollectionCache<LeaderboardEntry>,
}

impl Resource for Leaderboard {
    const KIND: &'static str = "leaderboard";
    const SCHEMA: Schema = SCHEMA;
    type Context = LeaderboardContext;
    type Collections = LeaderboardCollections;

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        let segment_id = entity.segment_id().ok_or(GraphError::InvalidOperation {
            operation: "fetch leaderboard",
            reason: "the leaderboard has no segment_id",
        })?;
        Ok(format!("segments/{segment_id}/leaderboard"))
    }

    fn absorb(entity: &Entity<Self>, payload: &PayloadObject) -> GraphResult<()> {
        let client = entity.client();
        entity.with_collections(|c| {
            reconcile_nested(&mut c.entries, payload.get("entries"), client, "leaderboard.entries")
                .map(|_| ())
        })
    }
}

impl Entity<Leaderboard> {
    /// Parent segment id, from the context or else the payload
    #[must_use]
    pub fn segment_id(&self) -> Option<EntityId> {
        self.context()
            .segment_id
            .clone()
            .or_else(|| self.foreign_key("segment_id"))
    }

    /// Total number of entries the API reports
    #[must_use]
    pub fn entry_count(&self) -> Option<u64> {
        self.u64_attr("entry_count")
    }

    /// Fetch one standings page and merge it into the entry cache
    ///
    /// Filters such as `gender`, `age_group` or `following` go in the
    /// query. Returns every cached entry sorted by rank. A standings page
    /// never marks the leaderboard `detailed`, so `ensure_detailed` still
    /// fetches the unfiltered board.
    ///
    /// # Errors
    ///
    /// Transport errors, `GraphError::DataShape` when the body is not an
    /// object, `GraphError::InvalidOperation` without a segment id.
    pub async fn get_standings(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<LeaderboardEntry>>> {
        let path = Leaderboard::detail_path(self)?;
        let value = self.client().get(&path, &query.to_params()).await?;
        match Payload::classify(value, &path)? {
            Payload::Empty => {}
            Payload::Object(object) => {
                SCHEMA.validate(&object, &path)?;
                self.merge(&object, Fidelity::Summary)?;
            }
            Payload::List(_) => return Err(GraphError::data_shape(path, "object", "list")),
        }
        Ok(self.standings())
    }

    /// Cached entries ordered by rank; unranked entries come last
    #[must_use]
    pub fn standings(&self) -> Vec<Handle<LeaderboardEntry>> {
        let mut entries = self.cached(|c| &mut c.entries);
        entries.sort_by_cached_key(|entry| entry.rank().unwrap_or(u64::MAX));
        entries
    }
}
