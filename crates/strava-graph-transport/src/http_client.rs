// ABOUTME: Shared HTTP client with connection pooling for API calls
// ABOUTME: Singleton with configurable timeouts; custom timeouts get a dedicated client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use strava_graph_core::constants::api::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};

use crate::config::TransportConfig;

/// Global shared HTTP client with the default timeouts
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get the shared HTTP client
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| build_client(DEFAULT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS))
}

/// Client honouring `config` timeouts, reusing the shared pool when they are the defaults
#[must_use]
pub fn client_for(config: &TransportConfig) -> Client {
    if config.has_custom_timeouts() {
        build_client(config.timeout_secs, config.connect_timeout_secs)
    } else {
        shared_client().clone()
    }
}

fn build_client(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .user_agent(concat!("strava-graph/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}
