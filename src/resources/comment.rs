// ABOUTME: Activity comment resource with its author and a lazily resolved parent activity
// ABOUTME: Deletion is a write pass-through on the comment's own path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;
use strava_graph_core::{GraphError, GraphResult, Params, PayloadObject};
use strava_graph_transport::Method;

use crate::entity::schema::{Field, FieldKind, Schema};
use crate::entity::{Entity, Handle, Resource};
use crate::reconcile::reconcile_slot;
use crate::resources::{athlete, Activity, Athlete};

const FIELDS: &[Field] = &[
    Field::new("text", FieldKind::Text),
    Field::new("created_at", FieldKind::Timestamp),
    Field::new("activity_id", FieldKind::Integer),
    Field::nested_one("athlete", &athlete::SCHEMA),
];

pub(crate) const SCHEMA: Schema = Schema::keyed_by_id(FIELDS);

/// A comment on an activity
#[derive(Debug)]
pub struct Comment;

/// Related entities of a comment
#[derive(Default)]
pub struct CommentCollections {
    athlete: Option<Handle<Athlete>>,
    activity: Option<Handle<Activity>>,
}

impl Resource for Comment {
    const KIND: &'static str = "comment";
    const SCHEMA: Schema = SCHEMA;
    type Context = ();
    type Collections = CommentCollections;

    fn detail_path(entity: &Entity<Self>) -> GraphResult<String> {
        let id = entity.require_id("address comment")?;
        let activity_id = entity
            .foreign_key("activity_id")
            .ok_or(GraphError::InvalidOperation {
                operation: "address comment",
                reason: "the payload has no activity_id",
            })?;
        Ok(format!("activities/{activity_id}/comments/{id}"))
    }

    fn absorb(entity: &Entity<Self>, payload: &PayloadObject) -> GraphResult<()> {
        let client = entity.client();
        entity.with_collections(|c| {
            reconcile_slot(&mut c.athlete, payload.get("athlete"), client, "comment.athlete")
        })
    }
}

impl Entity<Comment> {
    /// Comment text
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.str_attr("text")
    }

    /// Author, as embedded in the payload
    #[must_use]
    pub fn athlete(&self) -> Option<Handle<Athlete>> {
        self.slot(|c| &mut c.athlete)
    }

    /// Activity the comment belongs to, as a `meta` entity
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidOperation`] when the payload has no `activity_id`.
    pub fn activity(&self) -> GraphResult<Handle<Activity>> {
        self.reference(|c| &mut c.activity, "activity_id", "resolve comment activity")
    }

    /// Delete the comment
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidOperation`] without `activity_id`; transport errors.
    pub async fn delete(&self) -> GraphResult<Value> {
        let path = Comment::detail_path(self)?;
        self.action(Method::Delete, &path, &Params::new()).await
    }
}
