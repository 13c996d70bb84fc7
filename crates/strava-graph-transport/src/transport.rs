// ABOUTME: Transport trait the entity graph depends on for all network operations
// ABOUTME: GET/POST/PUT/DELETE returning decoded JSON, plus the last observed quota usage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use strava_graph_core::{GraphResult, Params, Usage};

/// HTTP method of a transport request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read
    Get,
    /// Create / action
    Post,
    /// Update
    Put,
    /// Remove
    Delete,
}

impl Method {
    /// Uppercase method name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether parameters travel in the query string rather than a form body
    #[must_use]
    pub const fn uses_query(self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated access to the API
///
/// Implementations return the decoded body (an object, or a list of objects)
/// and must surface 401/403 responses as
/// [`GraphError::Authorization`](strava_graph_core::GraphError::Authorization)
/// without retrying.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request against a path relative to the API base
    async fn request(&self, method: Method, path: &str, params: &Params) -> GraphResult<Value>;

    /// Quota usage reported by the most recent response, if any
    fn usage(&self) -> Option<Usage> {
        None
    }

    /// `GET path?params`
    async fn get(&self, path: &str, params: &Params) -> GraphResult<Value> {
        self.request(Method::Get, path, params).await
    }

    /// `POST path` with form parameters
    async fn post(&self, path: &str, params: &Params) -> GraphResult<Value> {
        self.request(Method::Post, path, params).await
    }

    /// `PUT path` with form parameters
    async fn put(&self, path: &str, params: &Params) -> GraphResult<Value> {
        self.request(Method::Put, path, params).await
    }

    /// `DELETE path?params`
    async fn delete(&self, path: &str, params: &Params) -> GraphResult<Value> {
        self.request(Method::Delete, path, params).await
    }
}

/// Shared handle to the transport an object graph was fetched through
pub type ClientRef = Arc<dyn Transport>;
