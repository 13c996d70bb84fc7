// ABOUTME: Core types and constants for the strava-graph entity cache
// ABOUTME: Foundation crate with error handling, fidelity, identity, payload shapes and quota usage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # strava-graph core
//!
//! Foundation crate shared by the transport and the entity graph. It changes
//! infrequently, so the heavier crates above it recompile on their own.
//!
//! ## Modules
//!
//! - **errors**: `GraphError`, `ErrorCode` and the `GraphResult` alias
//! - **fidelity**: the three-level `meta < summary < detailed` resource state
//! - **ids**: opaque, API-assigned entity identity
//! - **payload**: classification of raw response bodies into reconcilable shapes
//! - **params**: ordered request parameters with nil-dropping semantics
//! - **pagination**: page / filter query for collection accessors
//! - **usage**: API quota usage parsed from rate-limit headers
//! - **constants**: endpoints, environment keys and paging limits

/// Unified error handling with standard error codes
pub mod errors;

/// Endpoint defaults, environment variable names and paging limits
pub mod constants;

/// Three-level resource fidelity state machine
pub mod fidelity;

/// Entity identity as assigned by the API
pub mod ids;

/// Raw payload shape classification
pub mod payload;

/// Request parameters for transport calls
pub mod params;

/// Page and filter query for collection accessors
pub mod pagination;

/// Rate-limit quota usage
pub mod usage;

pub use errors::{ApiFieldError, ErrorCode, GraphError, GraphResult};
pub use fidelity::Fidelity;
pub use ids::EntityId;
pub use pagination::CollectionQuery;
pub use params::Params;
pub use payload::{Payload, PayloadObject};
pub use usage::Usage;
