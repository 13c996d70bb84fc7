// ABOUTME: Page and filter query for lazily hydrated collections
// ABOUTME: Any explicit page, page size or filter forces a fresh fetch instead of the cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Collection queries
//!
//! Collections are read in one of two modes. With no arguments the accessor
//! trusts whatever its identity cache already holds and only fetches when the
//! cache is empty. With a page, a page size, or any filter, the caller asks
//! for one specific slice of the server-side collection, so the accessor
//! always goes to the network. Filters are sent to the API but never key a
//! cache: only entity identity is de-duplicated, not page results.

use std::fmt::Display;

use crate::constants::paging::MAX_PER_PAGE;
use crate::params::Params;

/// Page, page size and domain filters for a collection accessor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Items per page, clamped to the API maximum
    pub per_page: Option<u32>,
    /// Domain filters (`before`, `after`, `start_date_local`, ...)
    pub filters: Params,
}

impl CollectionQuery {
    /// No page, no filters: serve from cache when populated
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A specific page at the default page size
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Set the page number
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size, clamped to `1..=MAX_PER_PAGE`
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page.clamp(1, MAX_PER_PAGE));
        self
    }

    /// Add a domain filter
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.filters.push(key, value);
        self
    }

    /// Add a domain filter when it has a value
    #[must_use]
    pub fn with_filter_opt<V: Display>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with_filter(key, value),
            None => self,
        }
    }

    /// Whether the caller asked for a specific slice rather than "the collection"
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.page.is_some() || self.per_page.is_some() || !self.filters.is_empty()
    }

    /// Request parameters for this query
    #[must_use]
    pub fn to_params(&self) -> Params {
        let mut params = Params::new()
            .with_opt("page", self.page)
            .with_opt("per_page", self.per_page);
        params.extend(&self.filters);
        params
    }
}
