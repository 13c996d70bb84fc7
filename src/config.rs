// ABOUTME: Top-level configuration bundling transport, logging and the athlete access token
// ABOUTME: Environment-only; every value has a default except the credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt;

use strava_graph_core::constants::env_config;
use strava_graph_transport::TransportConfig;

use crate::logging::LoggingConfig;

/// Everything needed to stand up a client from the environment
#[derive(Clone, Default)]
pub struct GraphConfig {
    /// HTTP transport settings and application credentials
    pub transport: TransportConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Athlete access token (`STRAVA_ACCESS_TOKEN`)
    pub access_token: Option<String>,
}

impl GraphConfig {
    /// Load every section from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            transport: TransportConfig::from_env(),
            logging: LoggingConfig::from_env(),
            access_token: env::var(env_config::ACCESS_TOKEN)
                .ok()
                .filter(|token| !token.trim().is_empty()),
        }
    }

    /// Replace the access token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

impl fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphConfig")
            .field("transport", &self.transport)
            .field("logging", &self.logging)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
