// ABOUTME: Reconciliation of raw API payloads into per-parent identity maps
// ABOUTME: Known ids are merged in place, new ids constructed and inserted, payload order preserved
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Reconciler
//!
//! The only place entities enter a cache. The whole payload is classified and
//! schema-validated before the cache is touched, so a malformed response never
//! leaves a cache half-updated.

use std::collections::HashMap;

use serde_json::Value;
use strava_graph_core::{EntityId, Fidelity, GraphError, GraphResult, Payload, PayloadObject};
use strava_graph_transport::ClientRef;
use tracing::{debug, warn};

use crate::entity::{Entity, Handle, Resource};

/// Insertion-ordered identity map of one sub-collection
pub struct CollectionCache<C: Resource> {
    order: Vec<EntityId>,
    entries: HashMap<EntityId, Handle<C>>,
}

impl<C: Resource> Default for CollectionCache<C> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<C: Resource> CollectionCache<C> {
    /// Canonical handle for `id`
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<Handle<C>> {
        self.entries.get(id).cloned()
    }

    /// Whether `id` is cached
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entries.contains_key(id)
    }

    /// Insert a handle; an existing id keeps its original position
    pub fn insert(&mut self, id: EntityId, handle: Handle<C>) {
        if self.entries.insert(id.clone(), handle).is_none() {
            self.order.push(id);
        }
    }

    /// All cached handles in first-insertion order
    #[must_use]
    pub fn values(&self) -> Vec<Handle<C>> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).cloned())
            .collect()
    }

    /// Cached ids in first-insertion order
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Number of cached entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing has been cached yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Ordered view of the entities one accessor has seen in a shared identity map
///
/// Sibling accessors (friends and followers, members and admins) reconcile
/// into one [`CollectionCache`] so an id is one entity under its parent; each
/// keeps its own roster for order and membership.
#[derive(Debug, Default)]
pub struct Roster {
    ids: Vec<EntityId>,
}

impl Roster {
    /// Append the ids of `handles` not listed yet, in order
    pub fn record<C: Resource>(&mut self, handles: &[Handle<C>]) {
        for id in handles.iter().filter_map(|handle| handle.id()) {
            if !self.ids.contains(id) {
                self.ids.push(id.clone());
            }
        }
    }

    /// Canonical handles of the listed ids, looked up in `cache`
    #[must_use]
    pub fn resolve<C: Resource>(&self, cache: &CollectionCache<C>) -> Vec<Handle<C>> {
        self.ids.iter().filter_map(|id| cache.get(id)).collect()
    }

    /// Listed ids in first-seen order
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Whether this accessor has seen nothing yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Reconcile a raw response body into `cache`
///
/// Empty lists and objects return nothing and leave the cache untouched. A
/// single object or each element of a list is merged into the cached entity
/// with the same id, or constructed and inserted when unseen. The returned
/// handles follow payload order.
///
/// # Errors
///
/// [`GraphError::DataShape`] for
/// scalars, `null`, lists with non-object elements, or malformed nested
/// sub-payloads; the cache is untouched in that case.
pub fn reconcile<C: Resource>(
    cache: &mut CollectionCache<C>,
    value: Value,
    client: &ClientRef,
    hint: Fidelity,
    context: &str,
) -> GraphResult<Vec<Handle<C>>> {
    let payload = Payload::classify(value, context)?;
    reconcile_payload(cache, payload, client, hint, context)
}

/// [`reconcile`] for an already classified payload
///
/// # Errors
///
/// See [`reconcile`].
pub fn reconcile_payload<C: Resource>(
    cache: &mut CollectionCache<C>,
    payload: Payload,
    client: &ClientRef,
    hint: Fidelity,
    context: &str,
) -> GraphResult<Vec<Handle<C>>> {
    let objects = payload.into_objects();
    for object in &objects {
        C::SCHEMA.validate(object, context)?;
    }

    let mut merged = 0_usize;
    let mut handles = Vec::with_capacity(objects.len());
    for object in objects {
        let id = C::SCHEMA.identity_of(&object);
        let handle = match id {
            Some(id) => {
                if let Some(existing) = cache.get(&id) {
                    existing.merge(&object, hint)?;
                    merged += 1;
                    existing
                } else {
                    let created =
                        Entity::from_validated(object, client.clone(), hint, C::Context::default())?;
                    cache.insert(id, created.clone());
                    created
                }
            }
            None => {
                warn!("{context}: {} payload without identity; returned but not cached", C::KIND);
                Entity::from_validated(object, client.clone(), hint, C::Context::default())?
            }
        };
        handles.push(handle);
    }

    debug!(
        "{context}: reconciled {} {} ({merged} merged, {} cached)",
        handles.len(),
        C::KIND,
        cache.len()
    );
    Ok(handles)
}

/// Reconcile an optional nested value (absent or `null` is a no-op)
///
/// # Errors
///
/// See [`reconcile`].
pub fn reconcile_nested<C: Resource>(
    cache: &mut CollectionCache<C>,
    value: Option<&Value>,
    client: &ClientRef,
    context: &str,
) -> GraphResult<Vec<Handle<C>>> {
    match Payload::nested(value, context)? {
        Some(payload) => reconcile_payload(cache, payload, client, Fidelity::Summary, context),
        None => Ok(Vec::new()),
    }
}

/// Reconcile a nested single object into a one-entity slot
///
/// The slot keeps its handle when the incoming object carries the same id,
/// and is replaced by a fresh entity otherwise. Absent or `null` leaves the
/// slot as it is.
///
/// # Errors
///
/// [`GraphError::DataShape`] when the
/// value is not an object.
pub fn reconcile_slot<C: Resource>(
    slot: &mut Option<Handle<C>>,
    value: Option<&Value>,
    client: &ClientRef,
    context: &str,
) -> GraphResult<()> {
    let object: PayloadObject = match Payload::nested(value, context)? {
        None | Some(Payload::Empty) => return Ok(()),
        Some(Payload::Object(object)) => object,
        Some(Payload::List(_)) => {
            return Err(GraphError::data_shape(context, "object", "list"))
        }
    };
    C::SCHEMA.validate(&object, context)?;

    let incoming = C::SCHEMA.identity_of(&object);
    if let Some(current) = slot.as_ref() {
        if incoming.is_some() && current.id() == incoming.as_ref() {
            return current.merge(&object, Fidelity::Summary);
        }
    }
    *slot = Some(Entity::from_validated(
        object,
        client.clone(),
        Fidelity::Summary,
        C::Context::default(),
    )?);
    Ok(())
}
