// ABOUTME: Environment-driven configuration tests for transport, logging and credentials
// ABOUTME: Serialized because every test mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::env;

use serial_test::serial;
use strava_graph::logging::{LogFormat, LoggingConfig};
use strava_graph::{GraphConfig, GraphError, StravaClient};
use strava_graph_core::constants::{api, env_config};

const KEYS: &[&str] = &[
    env_config::ACCESS_TOKEN,
    env_config::API_BASE,
    env_config::CLIENT_ID,
    env_config::CLIENT_SECRET,
    env_config::HTTP_TIMEOUT_SECS,
    env_config::HTTP_CONNECT_TIMEOUT_SECS,
    "LOG_FORMAT",
    "LOG_INCLUDE_LOCATION",
    "SERVICE_NAME",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = GraphConfig::from_env();

    assert!(config.access_token.is_none());
    assert_eq!(config.transport.api_base_url, api::DEFAULT_BASE_URL);
    assert_eq!(config.transport.timeout_secs, api::DEFAULT_TIMEOUT_SECS);
    assert!(config.transport.client_id.is_none());
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(!config.logging.include_location);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var(env_config::ACCESS_TOKEN, "athlete-token");
    env::set_var(env_config::API_BASE, "http://localhost:9000/api/v3/");
    env::set_var(env_config::HTTP_TIMEOUT_SECS, "5");
    env::set_var(env_config::HTTP_CONNECT_TIMEOUT_SECS, "not-a-number");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("LOG_INCLUDE_LOCATION", "1");
    env::set_var("SERVICE_NAME", "graph-test");

    let config = GraphConfig::from_env();
    clear_env();

    assert_eq!(config.access_token.as_deref(), Some("athlete-token"));
    assert_eq!(config.transport.api_base_url, "http://localhost:9000/api/v3/");
    assert_eq!(config.transport.timeout_secs, 5);
    assert_eq!(
        config.transport.connect_timeout_secs,
        api::DEFAULT_CONNECT_TIMEOUT_SECS
    );
    assert!(config.transport.has_custom_timeouts());
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.logging.include_location);
    assert_eq!(config.logging.service_name, "graph-test");
}

#[test]
#[serial]
fn test_blank_token_is_treated_as_missing() {
    clear_env();
    env::set_var(env_config::ACCESS_TOKEN, "   ");

    let config = GraphConfig::from_env();
    clear_env();

    assert!(config.access_token.is_none());
    let err = StravaClient::from_config(&config).unwrap_err();
    assert!(matches!(err, GraphError::Configuration(_)));
}

#[test]
#[serial]
fn test_application_credentials_stand_in_for_token() {
    clear_env();
    env::set_var(env_config::CLIENT_ID, "1234");
    env::set_var(env_config::CLIENT_SECRET, "secret");

    let config = GraphConfig::from_env();
    clear_env();

    assert!(StravaClient::from_config(&config).is_ok());
    let debug = format!("{config:?}");
    assert!(!debug.contains("secret\""));
    assert!(debug.contains("[REDACTED]"));
}

#[test]
#[serial]
fn test_access_token_is_redacted() {
    clear_env();

    let config = GraphConfig::default().with_access_token("very-private");

    assert!(!format!("{config:?}").contains("very-private"));
    assert!(StravaClient::from_config(&config).is_ok());
}

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
    assert_eq!(LogFormat::parse(" compact "), LogFormat::Compact);
    assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    assert_eq!(LoggingConfig::default().level, "info");
}
