// ABOUTME: Lazy, paginated sub-collection accessor shared by every parent/child pair
// ABOUTME: Explicit page/filter queries always fetch; bare calls fetch once and then serve the cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;
use strava_graph_core::{CollectionQuery, Fidelity, GraphResult, Params};
use tracing::debug;

use crate::entity::{Entity, Handle, Resource};
use crate::reconcile::{reconcile, CollectionCache, Roster};

/// Picks one sub-collection cache out of a parent's collections
pub type Select<R, C> = fn(&mut <R as Resource>::Collections) -> &mut CollectionCache<C>;

/// Picks a shared identity map and one accessor's roster over it
pub type SharedSelect<R, C> =
    fn(&mut <R as Resource>::Collections) -> (&mut CollectionCache<C>, &mut Roster);

impl<R: Resource> Entity<R> {
    /// Read a sub-collection through its cache
    ///
    /// With any page, page size or filter in `query` the page is always
    /// fetched and its canonical entities are returned in payload order.
    /// Without one, the first call on an empty cache fetches the first page and
    /// every later call returns the cached entities without a request.
    ///
    /// # Errors
    ///
    /// Transport errors and data-shape errors from reconciliation.
    pub async fn collection<C: Resource>(
        &self,
        select: Select<R, C>,
        path: &str,
        query: &CollectionQuery,
    ) -> GraphResult<Vec<Handle<C>>> {
        self.collection_with(select, path, Params::new(), query).await
    }

    /// [`Entity::collection`] with fixed parameters sent on every fetch
    ///
    /// # Errors
    ///
    /// See [`Entity::collection`].
    pub async fn collection_with<C: Resource>(
        &self,
        select: Select<R, C>,
        path: &str,
        base: Params,
        query: &CollectionQuery,
    ) -> GraphResult<Vec<Handle<C>>> {
        if query.is_explicit() {
            let mut params = base;
            params.extend(&query.to_params());
            let value = self.client().get(path, &params).await?;
            return self.absorb_page(select, path, value);
        }

        let cached = self.with_collections(|collections| {
            let cache = select(collections);
            (!cache.is_empty()).then(|| cache.values())
        });
        if let Some(values) = cached {
            debug!("{path}: serving {} cached {}", values.len(), C::KIND);
            return Ok(values);
        }

        let value = self.client().get(path, &base).await?;
        self.absorb_page(select, path, value)?;
        Ok(self.with_collections(|collections| select(collections).values()))
    }

    /// Read a sub-collection whose entities live in a map shared with siblings
    ///
    /// Same page and cache policy as [`Entity::collection`], except the bare
    /// call is answered from the accessor's own roster: entities another
    /// accessor put in the shared map do not count as fetched here.
    ///
    /// # Errors
    ///
    /// Transport errors and data-shape errors from reconciliation.
    pub async fn shared_collection<C: Resource>(
        &self,
        select: SharedSelect<R, C>,
        path: &str,
        query: &CollectionQuery,
    ) -> GraphResult<Vec<Handle<C>>> {
        if !query.is_explicit() {
            let cached = self.with_collections(|collections| {
                let (cache, roster) = select(collections);
                (!roster.is_empty()).then(|| roster.resolve(cache))
            });
            if let Some(values) = cached {
                debug!("{path}: serving {} cached {}", values.len(), C::KIND);
                return Ok(values);
            }
        }

        let value = self.client().get(path, &query.to_params()).await?;
        self.with_collections(|collections| {
            let (cache, roster) = select(collections);
            let handles = reconcile(cache, value, self.client(), Fidelity::Summary, path)?;
            roster.record(&handles);
            Ok(if query.is_explicit() {
                handles
            } else {
                roster.resolve(cache)
            })
        })
    }

    /// Cached entities only, never fetching
    #[must_use]
    pub fn cached<C: Resource>(&self, select: Select<R, C>) -> Vec<Handle<C>> {
        self.with_collections(|collections| select(collections).values())
    }

    fn absorb_page<C: Resource>(
        &self,
        select: Select<R, C>,
        path: &str,
        value: Value,
    ) -> GraphResult<Vec<Handle<C>>> {
        self.with_collections(|collections| {
            reconcile(select(collections), value, self.client(), Fidelity::Summary, path)
        })
    }
}
