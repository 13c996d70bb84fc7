// ABOUTME: Club announcement resource carrying its author as a nested athlete
// ABOUTME: Announcements are only listed through their club
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use strava_graph_core::{GraphError, GraphResult, PayloadObject};

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource};
use crate::reconcile::reconcile_slot;
use crate::resources::{athlete, Athlete, Club};

const FIELDS: &[Field] = &[
    Field::new("club_id", FieldKind::Integer),
    Field::new("message", FieldKind::Text),
    Field::new("created_at", FieldKind::Timestamp),
    Field::nested_one("athlete", &athlete::SCHEMA),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// A message posted to a club
#[derive(Debug)]
pub struct ClubAnnouncement;

/// Related entities of an announcement
#[derive(Default)]
pub struct ClubAnnouncementCollections {
    athlete: Option<Handle<Athlete>>,
    club: Option<Handle<Club>>,
}

impl Resource for ClubAnnouncement {
    const KIND: &'static str = "club_announcement";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = ClubAnnouncementCollections;

    fn detail_path(_entity: &Entity<Self>) -> GraphResult<String> {
        Err(GraphError::InvalidOperation {
            operation: "fetch club announcement details",
            reason: "announcements are only listed through their club",
        })
    }

    fn absorb(entity: &Entity<Self>, payload: &PayloadObject) -> GraphResult<()> {
        let client = entity.client();
        entity.with_collections(|c| {
            reconcile_slot(&mut c.athlete, payload.get("athlete"), client, "club_announcement.athlete")
        })
    }
}

impl Entity<ClubAnnouncement> {
    /// Announcement text
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.str_attr("message")
    }

    /// Author, as embedded in the payload
    #[must_use]
    pub fn athlete(&self) -> Option<Handle<Athlete>> {
        self.slot(|c| &mut c.athlete)
    }

    /// Club the announcement was posted to, as a `meta` entity
    ///
    /// # Errors
    ///
    /// `GraphError::InvalidOperation` when the payload has no `club_id`.
    pub fn club(&self) -> GraphResult<Handle<Club>> {
        self.reference(|c| &mut c.club, "club_id", "resolve announcement club")
    }
}
