// ABOUTME: Club group event resource with its attending athletes and RSVP writes
// ABOUTME: The owning club is resolved on demand from club_id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;
use strava_graph_core::{CollectionQuery, GraphResult, Params};
use strava_graph_transport::Method;

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource};
use crate::reconcile::CollectionCache;
use crate::resources::{Athlete, Club};

const FIELDS: &[Field] = &[
    Field::new("title", FieldKind::Text),
    Field::new("description", FieldKind::Text),
    Field::new("club_id", FieldKind::Integer),
    Field::new("organizing_athlete", FieldKind::Json),
    Field::new("activity_type", FieldKind::Text),
    Field::new("created_at", FieldKind::Timestamp),
    Field::new("route_id", FieldKind::Integer),
    Field::new("woman_only", FieldKind::Bool),
    Field::new("private", FieldKind::Bool),
    Field::new("skill_levels", FieldKind::Integer),
    Field::new("terrain", FieldKind::Integer),
    Field::new("upcoming_occurrences", FieldKind::Json),
    Field::new("address", FieldKind::Text),
    Field::new("joined", FieldKind::Bool),
    Field::new("start_latlng", FieldKind::Json),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// A scheduled club ride or run
#[derive(Debug)]
pub struct GroupEvent;

/// Sub-collections of a group event
#[derive(Default)]
pub struct GroupEventCollections {
    athletes: CollectionCache<Athlete>,
    club: Option<Handle<Club>>,
}

impl Resource for GroupEvent {
    const KIND: &'static str = "group_event";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = GroupEventCollections;

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        Ok(format!("group_events/{}", entity.require_id("fetch group event details")?))
    }
}

impl Entity<GroupEvent> {
    fn path(&self, suffix: &str) -> GraphResult<String> {
        Ok(format!("group_events/{}/{suffix}", self.require_id("address group event")?))
    }

    /// Event title
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.str_attr("title")
    }

    /// Athletes who joined the event
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn athletes(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Athlete>>> {
        let path = self.path("athletes")?;
        self.collection(|c| &mut c.athletes, &path, query).await
    }

    /// Club organising the event, as a `meta` entity
    ///
    /// # Errors
    ///
    /// `GraphError::InvalidOperation` when the payload has no `club_id`.
    pub fn club(&self) -> GraphResult<Handle<Club>> {
        self.reference(|c| &mut c.club, "club_id", "resolve group event club")
    }

    /// RSVP as the authenticated athlete
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub async fn join(&self) -> GraphResult<Value> {
        let path = self.path("rsvps")?;
        self.action(Method::Post, &path, &Params::new()).await
    }

    /// Withdraw the RSVP
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub async fn leave(&self) -> GraphResult<Value> {
        let path = self.path("rsvps")?;
        self.action(Method::Delete, &path, &Params::new()).await
    }

    /// Delete the event (organiser only)
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub async fn delete(&self) -> GraphResult<Value> {
        let path = GroupEvent::detail_path(self)?;
        self.action(Method::Delete, &path, &Params::new()).await
    }
}
