// ABOUTME: One ranked row of a segment leaderboard, identified by its effort_id
// ABOUTME: Athlete, activity and effort are resolved on demand from the row's foreign keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use strava_graph_core::{GraphError, GraphResult};

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource};
use crate::resources::{Activity, Athlete, SegmentEffort};

const FIELDS: &[Field] = &[
    Field::new("athlete_name", FieldKind::Text),
    Field::new("athlete_id", FieldKind::Integer),
    Field::new("athlete_gender", FieldKind::Text),
    Field::new("athlete_profile", FieldKind::Text),
    Field::new("average_hr", FieldKind::Float),
    Field::new("average_watts", FieldKind::Float),
    Field::new("distance", FieldKind::Float),
    Field::new("elapsed_time", FieldKind::Integer),
    Field::new("moving_time", FieldKind::Integer),
    Field::new("start_date", FieldKind::Timestamp),
    Field::new("start_date_local", FieldKind::Timestamp),
    Field::new("activity_id", FieldKind::Integer),
    Field::new("effort_id", FieldKind::Integer),
    Field::new("rank", FieldKind::Integer),
];

pub(crate) const SCHEMA: Schema = Schema {
    identity: &["effort_id"],
    fields: FIELDS,
};

/// A leaderboard row
#[derive(Debug)]
pub struct LeaderboardEntry;

/// Entities referenced by a row, resolved lazily
#[derive(Default)]
pub struct LeaderboardEntryCollections {
    athlete: Option<Handle<Athlete>>,
    activity: Option<Handle<Activity>>,
    effort: Option<Handle<SegmentEffort>>,
}

impl Resource for LeaderboardEntry {
    const KIND: &'static str = "leaderboard_entry";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = LeaderboardEntryCollections;

    fn detail_path(_entity: &Entity<Self>) -> GraphResult<String> {
        Err(GraphError::InvalidOperation {
            operation: "fetch leaderboard entry details",
            reason: "entries are only listed through their leaderboard",
        })
    }
}

impl Entity<LeaderboardEntry> {
    /// Position on the board, 1-based
    #[must_use]
    pub fn rank(&self) -> Option<u64> {
        self.u64_attr("rank")
    }

    /// Athlete display name as printed on the board
    #[must_use]
    pub fn athlete_name(&self) -> Option<String> {
        self.str_attr("athlete_name")
    }

    /// Elapsed time in seconds
    #[must_use]
    pub fn elapsed_time(&self) -> Option<u64> {
        self.u64_attr("elapsed_time")
    }

    /// Athlete who set the time, as a `meta` entity
    ///
    /// # Errors
    ///
    /// `GraphError::InvalidOperation` when the row has no `athlete_id`.
    pub fn athlete(&self) -> GraphResult<Handle<Athlete>> {
        self.reference(|c| &mut c.athlete, "athlete_id", "resolve leaderboard athlete")
    }

    /// Activity the effort belongs to, as a `meta` entity
    ///
    /// # Errors
    ///
    /// `GraphError::InvalidOperation` when the row has no `activity_id`.
    pub fn activity(&self) -> GraphResult<Handle<Activity>> {
        self.reference(|c| &mut c.activity, "activity_id", "resolve leaderboard activity")
    }

    /// The ranked effort, as a `meta` entity
    ///
    /// # Errors
    ///
    /// `GraphError::InvalidOperation` when the row has no `effort_id`.
    pub fn effort(&self) -> GraphResult<Handle<SegmentEffort>> {
        self.reference(|c| &mut c.effort, "effort_id", "resolve leaderboard effort")
    }
}
