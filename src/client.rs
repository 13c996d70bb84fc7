// ABOUTME: Entry-point facade that owns the transport and hands out root entities
// ABOUTME: The authenticated athlete, meta entities by id, race listings and segment explorer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Client facade
//!
//! [`StravaClient`] is where an object graph starts. Every entity it hands
//! out carries the same transport, and everything reached from those entities
//! does too.

use std::fmt;
use std::sync::Arc;

use strava_graph_core::{EntityId, Fidelity, GraphResult, Usage};
use strava_graph_transport::{ClientRef, HttpTransport, TransportConfig};
use tracing::info;

use crate::config::GraphConfig;
use crate::entity::{Entity, Handle, Resource, Seed};
use crate::resources::{
    Activity, Athlete, AthleteContext, Club, Gear, GroupEvent, Route, RunningRace, Segment,
    SegmentEffort,
};

/// Root of an object graph bound to one transport
#[derive(Clone)]
pub struct StravaClient {
    transport: ClientRef,
}

impl fmt::Debug for StravaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StravaClient").finish_non_exhaustive()
    }
}

impl StravaClient {
    /// Wrap an existing transport
    #[must_use]
    pub fn new(transport: ClientRef) -> Self {
        Self { transport }
    }

    /// HTTP client for an athlete access token
    ///
    /// # Errors
    ///
    /// `GraphError::Configuration` when the token is blank and `config`
    /// carries no application credentials, or the base URL is invalid.
    pub fn with_token(token: impl Into<String>, config: &TransportConfig) -> GraphResult<Self> {
        let transport = HttpTransport::from_token(Some(token.into()), config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// HTTP client from a loaded [`GraphConfig`]
    ///
    /// # Errors
    ///
    /// See [`StravaClient::with_token`].
    pub fn from_config(config: &GraphConfig) -> GraphResult<Self> {
        let transport = HttpTransport::from_token(config.access_token.clone(), &config.transport)?;
        info!("Strava client ready against {}", config.transport.api_base_url);
        Ok(Self::new(Arc::new(transport)))
    }

    /// Transport shared by every entity of this graph
    #[must_use]
    pub const fn transport(&self) -> &ClientRef {
        &self.transport
    }

    /// Quota usage from the most recent response
    #[must_use]
    pub fn usage(&self) -> Option<Usage> {
        self.transport.usage()
    }

    /// The authenticated athlete, fetched in detail
    ///
    /// # Errors
    ///
    /// Transport, authorization and data-shape errors.
    pub async fn current_athlete(&self) -> GraphResult<Handle<Athlete>> {
        Athlete::current(Arc::clone(&self.transport)).await
    }

    fn meta<R: Resource>(&self, id: impl Into<EntityId>, context: R::Context) -> GraphResult<Handle<R>> {
        Entity::construct_with(
            Seed::Id(id.into()),
            Arc::clone(&self.transport),
            Fidelity::Meta,
            context,
        )
    }

    /// Another athlete by id, not yet fetched
    ///
    /// # Errors
    ///
    /// Never fails for id seeds; the signature matches the other constructors.
    pub fn athlete(&self, id: impl Into<EntityId>) -> GraphResult<Handle<Athlete>> {
        self.meta(id, AthleteContext::default())
    }

    /// Activity by id, not yet fetched
    ///
    /// # Errors
    ///
    /// See [`StravaClient::athlete`].
    pub fn activity(&self, id: impl Into<EntityId>) -> GraphResult<Handle<Activity>> {
        self.meta(id, ())
    }

    /// Segment by id, not yet fetched
    ///
    /// # Errors
    ///
    /// See [`StravaClient::athlete`].
    pub fn segment(&self, id: impl Into<EntityId>) -> GraphResult<Handle<Segment>> {
        self.meta(id, ())
    }

    /// Segment effort by id, not yet fetched
    ///
    /// # Errors
    ///
    /// See [`StravaClient::athlete`].
    pub fn segment_effort(&self, id: impl Into<EntityId>) -> GraphResult<Handle<SegmentEffort>> {
        self.meta(id, ())
    }

    /// Club by id, not yet fetched
    ///
    /// # Errors
    ///
    /// See [`StravaClient::athlete`].
    pub fn club(&self, id: impl Into<EntityId>) -> GraphResult<Handle<Club>> {
        self.meta(id, ())
    }

    /// Gear by id (`b123` / `g123`), not yet fetched
    ///
    /// # Errors
    ///
    /// See [`StravaClient::athlete`].
    pub fn gear(&self, id: impl Into<EntityId>) -> GraphResult<Handle<Gear>> {
        self.meta(id, ())
    }

    /// Route by id, not yet fetched
    ///
    /// # Errors
    ///
    /// See [`StravaClient::athlete`].
    pub fn route(&self, id: impl Into<EntityId>) -> GraphResult<Handle<Route>> {
        self.meta(id, ())
    }

    /// Running race by id, not yet fetched
    ///
    /// # Errors
    ///
    /// See [`StravaClient::athlete`].
    pub fn running_race(&self, id: impl Into<EntityId>) -> GraphResult<Handle<RunningRace>> {
        self.meta(id, ())
    }

    /// Group event by id, not yet fetched
    ///
    /// # Errors
    ///
    /// See [`StravaClient::athlete`].
    pub fn group_event(&self, id: impl Into<EntityId>) -> GraphResult<Handle<GroupEvent>> {
        self.meta(id, ())
    }

    /// Running races of `year` (current year when `None`)
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn list_races(&self, year: Option<i32>) -> GraphResult<Vec<Handle<RunningRace>>> {
        RunningRace::list_races(&self.transport, year).await
    }

    /// Popular segments inside `bounds`
    ///
    /// # Errors
    ///
    /// Transport and data-shape errors.
    pub async fn segment_explorer(&self, bounds: Option<&str>) -> GraphResult<Vec<Handle<Segment>>> {
        Segment::explorer(&self.transport, bounds).await
    }
}
