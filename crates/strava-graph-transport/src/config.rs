// ABOUTME: Environment-only transport configuration (base URL, timeouts, app credentials)
// ABOUTME: Application credentials are injected here instead of living in mutable globals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt;

use strava_graph_core::constants::{api, env_config};
use tracing::warn;

/// Settings used to construct an [`HttpTransport`](crate::HttpTransport)
#[derive(Clone)]
pub struct TransportConfig {
    /// Base URL every relative path is joined to
    pub api_base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Application client id, used when no access token is given
    pub client_id: Option<String>,
    /// Application client secret, used when no access token is given
    pub client_secret: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            api_base_url: api::DEFAULT_BASE_URL.to_owned(),
            timeout_secs: api::DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: api::DEFAULT_CONNECT_TIMEOUT_SECS,
            client_id: None,
            client_secret: None,
        }
    }
}

impl TransportConfig {
    /// Load configuration from environment variables, falling back to defaults
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var(env_config::API_BASE).unwrap_or(defaults.api_base_url),
            timeout_secs: parse_secs(env_config::HTTP_TIMEOUT_SECS, defaults.timeout_secs),
            connect_timeout_secs: parse_secs(
                env_config::HTTP_CONNECT_TIMEOUT_SECS,
                defaults.connect_timeout_secs,
            ),
            client_id: non_empty_var(env_config::CLIENT_ID),
            client_secret: non_empty_var(env_config::CLIENT_SECRET),
        }
    }

    /// Override the base URL (useful against a local stub server)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into();
        self
    }

    /// Set application credentials
    #[must_use]
    pub fn with_application(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Whether timeouts differ from the shared client's defaults
    #[must_use]
    pub const fn has_custom_timeouts(&self) -> bool {
        self.timeout_secs != api::DEFAULT_TIMEOUT_SECS
            || self.connect_timeout_secs != api::DEFAULT_CONNECT_TIMEOUT_SECS
    }
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_secs(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {key}={raw}, using {default}s");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            env_config::API_BASE,
            env_config::CLIENT_ID,
            env_config::CLIENT_SECRET,
            env_config::HTTP_TIMEOUT_SECS,
            env_config::HTTP_CONNECT_TIMEOUT_SECS,
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        clear_env();
        let config = TransportConfig::from_env();
        assert_eq!(config.api_base_url, api::DEFAULT_BASE_URL);
        assert_eq!(config.client_id, None);
        assert!(!config.has_custom_timeouts());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var(env_config::CLIENT_ID, "1234");
        env::set_var(env_config::CLIENT_SECRET, "shh");
        env::set_var(env_config::HTTP_TIMEOUT_SECS, "5");
        let config = TransportConfig::from_env();
        assert_eq!(config.client_id.as_deref(), Some("1234"));
        assert_eq!(config.timeout_secs, 5);
        assert!(config.has_custom_timeouts());
        assert!(!format!("{config:?}").contains("shh"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_falls_back() {
        clear_env();
        env::set_var(env_config::HTTP_TIMEOUT_SECS, "soon");
        assert_eq!(TransportConfig::from_env().timeout_secs, api::DEFAULT_TIMEOUT_SECS);
        clear_env();
    }
}
