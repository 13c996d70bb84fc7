// ABOUTME: Main library entry point for the strava-graph entity cache
// ABOUTME: Identity-stable entities, payload reconciliation and lazy paginated collections over the v3 API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # strava-graph
//!
//! A client-side object model for the Strava v3 API. Responses are mapped
//! onto long-lived, identity-stable entities that remember how much of their
//! resource they hold (`meta`, `summary` or `detailed`) and fetch more only
//! when asked.
//!
//! ## Architecture
//!
//! - **entity**: the generic [`Entity`] with its fidelity state and schema-driven attributes
//! - **reconcile**: merges raw payloads into per-parent identity maps
//! - **collection**: the lazy-or-fetch accessor every sub-collection goes through
//! - **resources**: one module per API resource kind
//! - **client**: [`StravaClient`], the root of an object graph
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use strava_graph::{CollectionQuery, GraphConfig, GraphResult, StravaClient};
//!
//! #[tokio::main]
//! async fn main() -> GraphResult<()> {
//!     let client = StravaClient::from_config(&GraphConfig::from_env())?;
//!     let me = client.current_athlete().await?;
//!
//!     // First call fetches page one; later bare calls are served from the cache
//!     for activity in me.activities(&CollectionQuery::all()).await? {
//!         println!("{:?}", activity.name());
//!     }
//!     Ok(())
//! }
//! ```

/// Root facade handing out entities bound to one transport
pub mod client;

/// Sub-collection accessor shared by every parent/child pair
pub mod collection;

/// Environment-driven top-level configuration
pub mod config;

/// Generic entity, fidelity tracking and declarative schemas
pub mod entity;

/// Structured logging setup
pub mod logging;

/// Payload reconciliation into identity maps
pub mod reconcile;

/// Resource kinds of the v3 API
pub mod resources;

/// In-memory scripted transport for tests
pub mod test_utils;

pub use client::StravaClient;
pub use config::GraphConfig;
pub use entity::schema::{AttrValue, Attributes};
pub use entity::{Entity, Handle, Resource, Seed};
pub use reconcile::{CollectionCache, Roster};
pub use strava_graph_core::{
    CollectionQuery, EntityId, ErrorCode, Fidelity, GraphError, GraphResult, Params, Usage,
};
pub use strava_graph_transport::{ClientRef, HttpTransport, Method, Transport, TransportConfig};
