// ABOUTME: Club resource with its activity feed, group events, announcements, members and admins
// ABOUTME: Join and leave are write pass-throughs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;
use strava_graph_core::{CollectionQuery, GraphResult, Params};
use strava_graph_transport::Method;

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource};
use crate::reconcile::{CollectionCache, Roster};
use crate::resources::{Activity, Athlete, ClubAnnouncement, GroupEvent};

const FIELDS: &[Field] = &[
    Field::new("name", FieldKind::Text),
    Field::new("profile_medium", FieldKind::Text),
    Field::new("profile", FieldKind::Text),
    Field::new("cover_photo", FieldKind::Text),
    Field::new("cover_photo_small", FieldKind::Text),
    Field::new("description", FieldKind::Text),
    Field::new("club_type", FieldKind::Text),
    Field::new("sport_type", FieldKind::Text),
    Field::new("city", FieldKind::Text),
    Field::new("state", FieldKind::Text),
    Field::new("country", FieldKind::Text),
    Field::new("private", FieldKind::Bool),
    Field::new("member_count", FieldKind::Integer),
    Field::new("featured", FieldKind::Bool),
    Field::new("verified", FieldKind::Bool),
    Field::new("url", FieldKind::Text),
    Field::new("membership", FieldKind::Text),
    Field::new("admin", FieldKind::Bool),
    Field::new("owner", FieldKind::Bool),
    Field::new("following_count", FieldKind::Integer),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// A group of athletes
#[derive(Debug)]
pub struct Club;

/// Sub-collections of a club
#[derive(Default)]
pub struct ClubCollections {
    activities: CollectionCache<Activity>,
    group_events: CollectionCache<GroupEvent>,
    announcements: CollectionCache<ClubAnnouncement>,
    members: CollectionCache<Athlete>,
    member_ids: Roster,
    admin_ids: Roster,
}

impl Resource for Club {
    const KIND: &'static str = "club";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = ClubCollections;

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        Ok(format!("clubs/{}", entity.require_id("fetch club details")?))
    }
}

impl Entity<Club> {
    fn path(&self, suffix: &str) -> GraphResult<String> {
        Ok(format!("clubs/{}/{suffix}", self.require_id("read club collections")?))
    }

    /// Club name
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.str_attr("name")
    }

    /// Recent activities of club members; `before` is accepted as a filter
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn activities(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Activity>>> {
        let path = self.path("activities")?;
        self.collection(|c| &mut c.activities, &path, query).await
    }

    /// Upcoming group events; `before` is accepted as a filter
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn group_events(
        &self,
        query: &CollectionQuery,
    ) -> GraphResult<Vec<Handle<GroupEvent>>> {
        let path = self.path("group_events")?;
        self.collection(|c| &mut c.group_events, &path, query).await
    }

    /// Announcements posted to the club (not paginated)
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn announcements(&self) -> GraphResult<Vec<Handle<ClubAnnouncement>>> {
        let path = self.path("announcements")?;
        self.collection(|c| &mut c.announcements, &path, &CollectionQuery::all())
            .await
    }

    /// Club members
    ///
    /// A bare call fetches once even when `admins` already put
    /// some athletes in the shared member map.
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn members(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Athlete>>> {
        let path = self.path("members")?;
        self.shared_collection(|c| (&mut c.members, &mut c.member_ids), &path, query)
            .await
    }

    /// Club administrators, reconciled into the member map
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn admins(&self, query: &CollectionQuery) -> GraphResult<Vec<Handle<Athlete>>> {
        let path = self.path("admins")?;
        self.shared_collection(|c| (&mut c.members, &mut c.admin_ids), &path, query)
            .await
    }

    /// Join the club as the authenticated athlete
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub async fn join(&self) -> GraphResult<Value> {
        let path = self.path("join")?;
        self.action(Method::Post, &path, &Params::new()).await
    }

    /// Leave the club as the authenticated athlete
    ///
    /// # Errors
    ///
    /// Transport errors.
    pub async fn leave(&self) -> GraphResult<Value> {
        let path = self.path("leave")?;
        self.action(Method::Post, &path, &Params::new()).await
    }
}
