// ABOUTME: Credential resolution for transport construction
// ABOUTME: An athlete access token wins; otherwise application client id/secret from config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use strava_graph_core::{GraphError, GraphResult};

use crate::config::TransportConfig;

/// How requests are authenticated
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Athlete OAuth access token, sent as a bearer token
    AccessToken(String),
    /// Application credentials, sent as `client_id` / `client_secret` parameters
    Application {
        /// Application client id
        client_id: String,
        /// Application client secret
        client_secret: String,
    },
}

impl Credentials {
    /// Resolve credentials from an optional token and the configured application
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Configuration`] when no token is given and the
    /// configuration carries no complete application credentials.
    pub fn resolve(token: Option<String>, config: &TransportConfig) -> GraphResult<Self> {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            return Ok(Self::AccessToken(token));
        }
        match (&config.client_id, &config.client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(Self::Application {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => Err(GraphError::configuration(
                "missing client or access token: supply a token or configure STRAVA_CLIENT_ID and STRAVA_CLIENT_SECRET",
            )),
        }
    }

    /// Whether requests act on behalf of an athlete
    #[must_use]
    pub const fn is_athlete(&self) -> bool {
        matches!(self, Self::AccessToken(_))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessToken(_) => f.write_str("AccessToken([REDACTED])"),
            Self::Application { client_id, .. } => f
                .debug_struct("Application")
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_wins_over_application() {
        let config = TransportConfig::default().with_application("1", "secret");
        let creds = Credentials::resolve(Some("abc".into()), &config);
        assert!(matches!(creds, Ok(Credentials::AccessToken(ref t)) if t == "abc"));
    }

    #[test]
    fn test_application_fallback() {
        let config = TransportConfig::default().with_application("1", "secret");
        let creds = Credentials::resolve(None, &config);
        assert!(matches!(creds, Ok(Credentials::Application { .. })));
    }

    #[test]
    fn test_nothing_resolvable_is_configuration_error() {
        let creds = Credentials::resolve(Some("  ".into()), &TransportConfig::default());
        assert!(matches!(creds, Err(GraphError::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::AccessToken("ca16caf5b4cb".into());
        assert!(!format!("{creds:?}").contains("ca16"));
    }
}
