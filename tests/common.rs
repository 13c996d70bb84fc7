// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Quiet logging, scripted transports and JSON payload helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `strava_graph`

use std::env;
use std::sync::{Arc, Once};

use serde_json::{json, Map, Value};
use strava_graph::resources::{Athlete, AthleteContext};
use strava_graph::test_utils::ScriptedTransport;
use strava_graph::{ClientRef, Entity, Fidelity, Handle, Resource, Seed};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Wrap a scripted transport and return it together with its client handle
pub fn scripted(transport: ScriptedTransport) -> (Arc<ScriptedTransport>, ClientRef) {
    init_test_logging();
    let transport = Arc::new(transport);
    let client = transport.client();
    (transport, client)
}

/// JSON object literal as a payload map
pub fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("payload must be a JSON object")
}

/// Entity built from a summary payload
pub fn summary<R: Resource>(client: &ClientRef, value: Value) -> Handle<R> {
    Entity::<R>::construct(object(value), Some(client.clone()), Fidelity::Summary).unwrap()
}

/// The authenticated athlete, built without a request
pub fn current_athlete(client: &ClientRef, id: u64) -> Handle<Athlete> {
    Entity::construct_with(
        Seed::Payload(object(json!({"id": id, "resource_state": 3}))),
        client.clone(),
        Fidelity::Detailed,
        AthleteContext { current: true },
    )
    .unwrap()
}
