// ABOUTME: Generic long-lived entity: identity, raw payload, typed attributes and fidelity
// ABOUTME: Construction, lazy detail hydration and forced refresh shared by every resource kind
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Entities
//!
//! An [`Entity`] is the in-memory image of one API resource. It is always
//! shared as a [`Handle`] (`Arc<Entity<R>>`): the identity maps hand out the
//! same handle every time the same id shows up again, and updates from later
//! fetches are merged into that handle in place.
//!
//! Per-kind behaviour (detail path, nested sub-resources, sub-collections) is
//! supplied by the [`Resource`] implementation of the kind.

/// Declarative field schemas and typed attributes
pub mod schema;

use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde_json::Value;
use strava_graph_core::{EntityId, Fidelity, GraphError, GraphResult, Params, PayloadObject};
use strava_graph_transport::{ClientRef, HttpTransport, TransportConfig};
use tracing::debug;

use schema::{expect_object, AttrValue, Attributes, Schema};

/// Shared handle to an entity
pub type Handle<R> = Arc<Entity<R>>;

/// A resource kind: schema, construction context and sub-collections
pub trait Resource: Sized + Send + Sync + 'static {
    /// Short kind name used in paths of log lines and errors
    const KIND: &'static str;

    /// Field schema of this kind
    const SCHEMA: Schema;

    /// Construction context that is not part of the payload
    type Context: Clone + Default + Debug + Send + Sync;

    /// Sub-collection caches owned by each entity of this kind
    type Collections: Default + Send;

    /// Path of the single-resource endpoint
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidOperation`] for kinds or instances that
    /// have no detail endpoint.
    fn detail_path(entity: &Entity<Self>) -> GraphResult<String>;

    /// Reconcile nested sub-resources of `payload` into the entity's caches
    ///
    /// Called after every merge or replace. The payload has already passed
    /// [`Schema::validate`].
    ///
    /// # Errors
    ///
    /// Propagates reconciliation errors of nested payloads.
    fn absorb(entity: &Entity<Self>, payload: &PayloadObject) -> GraphResult<()> {
        let _ = (entity, payload);
        Ok(())
    }
}

/// What an entity is constructed from
#[derive(Debug, Clone)]
pub enum Seed {
    /// A known id with no data yet (`meta`)
    Id(EntityId),
    /// A payload received from the API
    Payload(PayloadObject),
}

impl From<EntityId> for Seed {
    fn from(id: EntityId) -> Self {
        Self::Id(id)
    }
}

impl From<PayloadObject> for Seed {
    fn from(payload: PayloadObject) -> Self {
        Self::Payload(payload)
    }
}

struct EntityState {
    raw: PayloadObject,
    attributes: Attributes,
    fidelity: Fidelity,
}

/// One API resource held in memory
pub struct Entity<R: Resource> {
    id: Option<EntityId>,
    client: ClientRef,
    context: R::Context,
    state: RwLock<EntityState>,
    collections: Mutex<R::Collections>,
}

impl<R: Resource> Entity<R> {
    /// Construct an entity with the default context
    ///
    /// Payload seeds are validated and projected immediately and take their
    /// fidelity from `resource_state`, falling back to `hint`. Id seeds defer
    /// population and start at [`Fidelity::Meta`].
    ///
    /// # Errors
    ///
    /// - [`GraphError::Configuration`] when `client` is `None`
    /// - [`GraphError::DataShape`] when a nested sub-payload is malformed
    pub fn construct(
        seed: impl Into<Seed>,
        client: Option<ClientRef>,
        hint: Fidelity,
    ) -> GraphResult<Handle<R>> {
        let client =
            client.ok_or_else(|| GraphError::configuration("missing client or access token"))?;
        Self::construct_with(seed.into(), client, hint, R::Context::default())
    }

    /// Construct an entity with an explicit context
    ///
    /// # Errors
    ///
    /// [`GraphError::DataShape`] when a nested sub-payload is malformed.
    pub fn construct_with(
        seed: Seed,
        client: ClientRef,
        hint: Fidelity,
        context: R::Context,
    ) -> GraphResult<Handle<R>> {
        match seed {
            Seed::Id(id) => Ok(Arc::new(Self::bare(Some(id), client, context))),
            Seed::Payload(raw) => {
                R::SCHEMA.validate(&raw, R::KIND)?;
                Self::from_validated(raw, client, hint, context)
            }
        }
    }

    /// Construct an entity over a fresh [`HttpTransport`] for `token`
    ///
    /// # Errors
    ///
    /// [`GraphError::Configuration`] when neither the token nor application
    /// credentials in `config` are usable.
    pub fn from_token(
        seed: impl Into<Seed>,
        token: Option<String>,
        config: &TransportConfig,
    ) -> GraphResult<Handle<R>> {
        let transport: ClientRef = Arc::new(HttpTransport::from_token(token, config)?);
        Self::construct(seed, Some(transport), Fidelity::Summary)
    }

    fn bare(id: Option<EntityId>, client: ClientRef, context: R::Context) -> Self {
        Self {
            id,
            client,
            context,
            state: RwLock::new(EntityState {
                raw: PayloadObject::new(),
                attributes: Attributes::default(),
                fidelity: Fidelity::Meta,
            }),
            collections: Mutex::new(R::Collections::default()),
        }
    }

    /// Build from a payload that already passed schema validation
    pub(crate) fn from_validated(
        raw: PayloadObject,
        client: ClientRef,
        hint: Fidelity,
        context: R::Context,
    ) -> GraphResult<Handle<R>> {
        let id = R::SCHEMA.identity_of(&raw);
        let fidelity = Fidelity::declared_by(&raw).unwrap_or(hint);
        let attributes = R::SCHEMA.project(&raw);
        let entity = Arc::new(Self {
            state: RwLock::new(EntityState {
                raw: PayloadObject::new(),
                attributes,
                fidelity,
            }),
            ..Self::bare(id, client, context)
        });
        R::absorb(&entity, &raw)?;
        entity.write_state().raw = raw;
        Ok(entity)
    }

    fn read_state<T>(&self, f: impl FnOnce(&EntityState) -> T) -> T {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, EntityState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to this entity's sub-collection caches
    pub(crate) fn with_collections<T>(&self, f: impl FnOnce(&mut R::Collections) -> T) -> T {
        f(&mut self.collections.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Merge a validated payload: incoming keys overwrite, absent keys are
    /// kept, fidelity only advances
    pub(crate) fn merge(&self, incoming: &PayloadObject, hint: Fidelity) -> GraphResult<()> {
        {
            let mut state = self.write_state();
            for (key, value) in incoming {
                state.raw.insert(key.clone(), value.clone());
            }
            let declared = Fidelity::declared_by(incoming).unwrap_or(hint);
            state.fidelity = state.fidelity.advance(declared);
            state.attributes = R::SCHEMA.project(&state.raw);
        }
        R::absorb(self, incoming)
    }

    /// Replace the payload wholesale after a detail fetch; fidelity never drops
    pub(crate) fn replace(&self, incoming: PayloadObject) -> GraphResult<()> {
        R::absorb(self, &incoming)?;
        let mut state = self.write_state();
        state.attributes = R::SCHEMA.project(&incoming);
        state.fidelity = state.fidelity.advance(Fidelity::Detailed);
        state.raw = incoming;
        Ok(())
    }

    /// Fetch the detailed representation unless it is already held
    ///
    /// Returns this same handle; no request is made when the entity is
    /// already [`Fidelity::Detailed`].
    ///
    /// # Errors
    ///
    /// Transport errors, [`GraphError::DataShape`] when the response is not a
    /// single object, or [`GraphError::InvalidOperation`] for kinds without a
    /// detail endpoint.
    pub async fn ensure_detailed(self: &Arc<Self>) -> GraphResult<Handle<R>> {
        if self.is_detailed() {
            debug!("{} {} already detailed", R::KIND, self.describe_id());
            return Ok(Arc::clone(self));
        }
        self.fetch_detail().await?;
        Ok(Arc::clone(self))
    }

    /// Alias of [`Entity::ensure_detailed`]
    ///
    /// # Errors
    ///
    /// See [`Entity::ensure_detailed`].
    pub async fn get_details(self: &Arc<Self>) -> GraphResult<Handle<R>> {
        self.ensure_detailed().await
    }

    /// Re-fetch the detail endpoint regardless of current fidelity
    ///
    /// # Errors
    ///
    /// See [`Entity::ensure_detailed`].
    pub async fn refresh(self: &Arc<Self>) -> GraphResult<Handle<R>> {
        self.fetch_detail().await?;
        Ok(Arc::clone(self))
    }

    async fn fetch_detail(&self) -> GraphResult<()> {
        let path = R::detail_path(self)?;
        debug!("Fetching details for {} {} from {path}", R::KIND, self.describe_id());
        let value = self.client.get(&path, &Params::new()).await?;
        let payload = expect_object(value, &path)?;
        R::SCHEMA.validate(&payload, &path)?;
        self.replace(payload)
    }

    fn describe_id(&self) -> &str {
        self.id.as_ref().map_or("(no id)", EntityId::as_str)
    }

    /// API-assigned identity, absent for parent-keyed singletons
    #[must_use]
    pub const fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    /// Resource kind name
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        R::KIND
    }

    /// Transport this entity and everything reached from it use
    #[must_use]
    pub const fn client(&self) -> &ClientRef {
        &self.client
    }

    /// Construction context
    #[must_use]
    pub const fn context(&self) -> &R::Context {
        &self.context
    }

    /// Current fidelity
    #[must_use]
    pub fn fidelity_state(&self) -> Fidelity {
        self.read_state(|s| s.fidelity)
    }

    /// Whether exactly the summary representation is held
    #[must_use]
    pub fn is_summary(&self) -> bool {
        self.fidelity_state() == Fidelity::Summary
    }

    /// Whether the detailed representation is held
    #[must_use]
    pub fn is_detailed(&self) -> bool {
        self.fidelity_state() == Fidelity::Detailed
    }

    /// Copy of the last received payload (merged across fetches)
    #[must_use]
    pub fn raw_payload(&self) -> PayloadObject {
        self.read_state(|s| s.raw.clone())
    }

    /// Raw payload value for `key`
    #[must_use]
    pub fn raw_value(&self, key: &str) -> Option<Value> {
        self.read_state(|s| s.raw.get(key).cloned())
    }

    /// Copy of the typed attributes
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.read_state(|s| s.attributes.clone())
    }

    /// One typed attribute
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<AttrValue> {
        self.read_state(|s| s.attributes.get(name).cloned())
    }

    /// String attribute
    #[must_use]
    pub fn str_attr(&self, name: &str) -> Option<String> {
        self.read_state(|s| s.attributes.str_attr(name).map(str::to_owned))
    }

    /// Numeric attribute
    #[must_use]
    pub fn f64_attr(&self, name: &str) -> Option<f64> {
        self.read_state(|s| s.attributes.f64_attr(name))
    }

    /// Non-negative integer attribute
    #[must_use]
    pub fn u64_attr(&self, name: &str) -> Option<u64> {
        self.read_state(|s| s.attributes.u64_attr(name))
    }

    /// Boolean attribute
    #[must_use]
    pub fn bool_attr(&self, name: &str) -> Option<bool> {
        self.read_state(|s| s.attributes.bool_attr(name))
    }

    /// Timestamp attribute
    #[must_use]
    pub fn datetime_attr(&self, name: &str) -> Option<DateTime<Utc>> {
        self.read_state(|s| s.attributes.datetime_attr(name))
    }

    /// Id-valued payload key, for resolving foreign keys
    pub(crate) fn foreign_key(&self, key: &str) -> Option<EntityId> {
        self.read_state(|s| s.raw.get(key).and_then(EntityId::from_value))
    }

    /// Id of this entity, or an error naming the operation that needed it
    pub(crate) fn require_id(&self, operation: &'static str) -> GraphResult<&EntityId> {
        self.id.as_ref().ok_or(GraphError::InvalidOperation {
            operation,
            reason: "entity has no id",
        })
    }
}

impl<R: Resource> Debug for Entity<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &R::KIND)
            .field("id", &self.id)
            .field("fidelity", &self.fidelity_state())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
