// ABOUTME: Error propagation tests from the transport through entities and collections
// ABOUTME: Authorization failures keep their field errors; caches stay untouched on failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use serde_json::json;
use strava_graph::resources::{Activity, Athlete, Club};
use strava_graph::test_utils::ScriptedTransport;
use strava_graph::{CollectionQuery, ErrorCode, GraphError, Method};
use strava_graph_core::ApiFieldError;

use common::{current_athlete, scripted, summary};

fn missing_write_permission() -> Vec<ApiFieldError> {
    vec![ApiFieldError {
        resource: "AccessToken".into(),
        field: "activity:read_permission".into(),
        code: "missing".into(),
    }]
}

#[tokio::test]
async fn test_authorization_failure_surfaces_from_detail_fetch() {
    let (_, client) = scripted(ScriptedTransport::new().fail_with(
        Method::Get,
        "activities/1",
        401,
        "Authorization Error",
        missing_write_permission(),
    ));
    let activity = summary::<Activity>(&client, json!({"id": 1, "name": "kept"}));

    let err = activity.ensure_detailed().await.unwrap_err();

    assert!(err.is_authorization());
    assert_eq!(err.code(), ErrorCode::AuthInvalid);
    match err {
        GraphError::Authorization {
            status, errors, ..
        } => {
            assert_eq!(status, 401);
            assert_eq!(errors, missing_write_permission());
        }
        other => panic!("expected Authorization, got {other:?}"),
    }
    assert!(activity.is_summary());
    assert_eq!(activity.name().as_deref(), Some("kept"));
}

#[tokio::test]
async fn test_authorization_failure_surfaces_from_collection() {
    let (_, client) = scripted(ScriptedTransport::new().fail(
        Method::Get,
        "athlete/activities",
        403,
        "Forbidden",
    ));
    let me = current_athlete(&client, 42);

    let err = me.activities(&CollectionQuery::all()).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::PermissionDenied);
    assert!(me.activities(&CollectionQuery::all()).await.is_err());
}

#[tokio::test]
async fn test_current_athlete_authorization_failure() {
    let (transport, client) =
        scripted(ScriptedTransport::new().fail(Method::Get, "athlete", 401, "Authorization Error"));

    let err = Athlete::current(client).await.unwrap_err();

    assert!(err.is_authorization());
    assert_eq!(transport.total_calls(), 1);
}

#[tokio::test]
async fn test_api_errors_and_rate_limits() {
    let (_, client) = scripted(
        ScriptedTransport::new()
            .fail(Method::Get, "clubs/5", 404, "Record Not Found")
            .fail(Method::Get, "clubs/5/members", 429, "Rate Limit Exceeded"),
    );
    let club = summary::<Club>(&client, json!({"id": 5}));

    let not_found = club.ensure_detailed().await.unwrap_err();
    assert!(matches!(not_found, GraphError::Api { status: 404, .. }));
    assert_eq!(not_found.code(), ErrorCode::ExternalServiceError);

    let limited = club.members(&CollectionQuery::all()).await.unwrap_err();
    assert_eq!(limited.code(), ErrorCode::ExternalRateLimited);
    assert!(limited.to_string().contains("429"));
}

#[tokio::test]
async fn test_unscripted_request_is_not_found() {
    let (_, client) = scripted(ScriptedTransport::new());
    let activity = summary::<Activity>(&client, json!({"id": 2}));

    let err = activity.kudos(&CollectionQuery::all()).await.unwrap_err();

    assert!(matches!(err, GraphError::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_shape_error_from_collection_leaves_cache_empty() {
    let (_, client) =
        scripted(ScriptedTransport::new().on_get("activities/2/comments", json!("oops")));
    let activity = summary::<Activity>(&client, json!({"id": 2}));

    let err = activity.comments(&CollectionQuery::all()).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidFormat);
    assert!(err.to_string().contains("activities/2/comments"));
}

#[test]
fn test_error_codes_map_to_http_statuses() {
    assert_eq!(ErrorCode::AuthInvalid.http_status(), 401);
    assert_eq!(ErrorCode::PermissionDenied.http_status(), 403);
    assert_eq!(
        GraphError::configuration("no token").code(),
        ErrorCode::ConfigMissing
    );
}
