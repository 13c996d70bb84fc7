// ABOUTME: Authenticated HTTP transport consumed by the strava-graph entity cache
// ABOUTME: Transport trait, credential resolution, environment config and the reqwest client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP transport for the entity graph.
//!
//! The graph only ever talks to the [`Transport`] trait. [`HttpTransport`] is
//! the production implementation; tests substitute an in-memory one.

/// Environment-driven transport configuration
pub mod config;
/// Access-token and application credential resolution
pub mod credentials;
/// reqwest-backed transport
pub mod http;
/// Shared HTTP client with connection pooling
pub mod http_client;
/// The transport trait and request methods
pub mod transport;

pub use config::TransportConfig;
pub use credentials::Credentials;
pub use http::HttpTransport;
pub use http_client::shared_client;
pub use transport::{ClientRef, Method, Transport};
