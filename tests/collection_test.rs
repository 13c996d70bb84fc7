// ABOUTME: Integration tests for the lazy paginated collection accessor
// ABOUTME: Explicit pages always fetch, bare calls serve the cache, filters reach the transport
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use serde_json::json;
use strava_graph::resources::{Activity, Club, Segment};
use strava_graph::test_utils::ScriptedTransport;
use strava_graph::{CollectionQuery, EntityId, Method};

use common::{current_athlete, scripted, summary};

#[tokio::test]
async fn test_explicit_page_fetches_every_time() {
    let (transport, client) = scripted(
        ScriptedTransport::new().on_get("athlete/activities", json!([{"id": 1}, {"id": 2}])),
    );
    let me = current_athlete(&client, 42);

    let first = me.activities(&CollectionQuery::page(1)).await.unwrap();
    let second = me.activities(&CollectionQuery::page(1)).await.unwrap();

    assert_eq!(transport.call_count(Method::Get, "athlete/activities"), 2);
    assert!(Arc::ptr_eq(&first[0], &second[0]));
    assert_eq!(transport.calls()[0].params.get("page"), Some("1"));
}

#[tokio::test]
async fn test_bare_call_fetches_once_then_serves_cache() {
    let (transport, client) =
        scripted(ScriptedTransport::new().on_get("athlete/activities", json!([{"id": 1}])));
    let me = current_athlete(&client, 42);

    let first = me.activities(&CollectionQuery::all()).await.unwrap();
    let second = me.activities(&CollectionQuery::all()).await.unwrap();

    assert_eq!(transport.call_count(Method::Get, "athlete/activities"), 1);
    assert!(transport.calls()[0].params.is_empty());
    assert_eq!(first.len(), 1);
    assert!(Arc::ptr_eq(&first[0], &second[0]));
}

#[tokio::test]
async fn test_empty_result_keeps_fetching() {
    let (transport, client) =
        scripted(ScriptedTransport::new().on_get("athlete/activities", json!([])));
    let me = current_athlete(&client, 42);

    assert!(me.activities(&CollectionQuery::all()).await.unwrap().is_empty());
    assert!(me.activities(&CollectionQuery::all()).await.unwrap().is_empty());

    assert_eq!(transport.call_count(Method::Get, "athlete/activities"), 2);
}

#[tokio::test]
async fn test_explicit_query_returns_only_that_page() {
    let (_, client) = scripted(
        ScriptedTransport::new()
            .on_get("athlete/activities", json!([{"id": 1}, {"id": 2}]))
            .on_get("athlete/activities", json!([{"id": 3}])),
    );
    let me = current_athlete(&client, 42);

    me.activities(&CollectionQuery::page(1)).await.unwrap();
    let page_two = me.activities(&CollectionQuery::page(2)).await.unwrap();
    assert_eq!(page_two.len(), 1);

    let everything = me.activities(&CollectionQuery::all()).await.unwrap();
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn test_filters_and_page_size_are_sent() {
    let (transport, client) =
        scripted(ScriptedTransport::new().on_get("segments/5/all_efforts", json!([{"id": 11}])));
    let segment = summary::<Segment>(&client, json!({"id": 5}));

    let query = CollectionQuery::all()
        .with_per_page(50)
        .with_filter("athlete_id", 42)
        .with_filter("start_date_local", "2024-01-01T00:00:00Z");
    let efforts = segment.efforts(&query).await.unwrap();

    assert_eq!(efforts.len(), 1);
    let params = &transport.calls()[0].params;
    assert_eq!(params.get("per_page"), Some("50"));
    assert_eq!(params.get("athlete_id"), Some("42"));
    assert_eq!(params.get("start_date_local"), Some("2024-01-01T00:00:00Z"));
    assert!(params.get("page").is_none());
}

#[tokio::test]
async fn test_photos_always_request_all_sources() {
    let (transport, client) = scripted(
        ScriptedTransport::new().on_get("activities/7/photos", json!([{"unique_id": "p-1"}])),
    );
    let activity = summary::<Activity>(&client, json!({"id": 7}));

    activity.photos(&CollectionQuery::all()).await.unwrap();
    activity.photos(&CollectionQuery::page(2)).await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert_eq!(call.params.get("photo_sources"), Some("true"));
    }
    assert_eq!(calls[1].params.get("page"), Some("2"));
}

#[tokio::test]
async fn test_friends_and_followers_share_one_identity_map() {
    let (transport, client) = scripted(
        ScriptedTransport::new()
            .on_get("athlete/friends", json!([{"id": 100, "firstname": "Ada"}]))
            .on_get("athlete/followers", json!([{"id": 101}, {"id": 100, "city": "Lyon"}])),
    );
    let me = current_athlete(&client, 42);

    let friends = me.friends(&CollectionQuery::all()).await.unwrap();
    let followers = me.followers(&CollectionQuery::all()).await.unwrap();
    let friends_again = me.friends(&CollectionQuery::all()).await.unwrap();

    assert_eq!(friends.len(), 1);
    assert_eq!(followers.len(), 2);
    assert!(Arc::ptr_eq(&friends[0], &followers[1]));
    assert_eq!(friends[0].firstname().as_deref(), Some("Ada"));
    assert_eq!(friends[0].str_attr("city").as_deref(), Some("Lyon"));
    assert_eq!(friends_again.len(), 1);
    assert_eq!(transport.total_calls(), 2);
}

#[tokio::test]
async fn test_both_following_reuses_known_connections() {
    let (_, client) = scripted(
        ScriptedTransport::new()
            .on_get("athlete/followers", json!([{"id": 100}]))
            .on_get("athletes/7/friends", json!([{"id": 100}, {"id": 102}])),
    );
    let me = current_athlete(&client, 42);

    let followers = me.followers(&CollectionQuery::all()).await.unwrap();
    let shared = me
        .both_following(&EntityId::from(7_u64), &CollectionQuery::all())
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&followers[0], &shared[0]));
    assert_eq!(me.followers(&CollectionQuery::all()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_club_admins_are_members() {
    let (transport, client) = scripted(
        ScriptedTransport::new()
            .on_get("clubs/5/admins", json!([{"id": 7}]))
            .on_get("clubs/5/members", json!([{"id": 7}, {"id": 8}])),
    );
    let club = summary::<Club>(&client, json!({"id": 5}));

    let admins = club.admins(&CollectionQuery::all()).await.unwrap();
    let members = club.members(&CollectionQuery::all()).await.unwrap();
    club.members(&CollectionQuery::all()).await.unwrap();
    club.admins(&CollectionQuery::all()).await.unwrap();

    assert_eq!(members.len(), 2);
    assert!(Arc::ptr_eq(&admins[0], &members[0]));
    assert_eq!(transport.call_count(Method::Get, "clubs/5/admins"), 1);
    assert_eq!(transport.call_count(Method::Get, "clubs/5/members"), 1);
}

#[tokio::test]
async fn test_failed_fetch_leaves_cache_empty() {
    let (transport, client) = scripted(
        ScriptedTransport::new()
            .fail(Method::Get, "athlete/activities", 500, "boom")
            .on_get("athlete/activities", json!([{"id": 1}])),
    );
    let me = current_athlete(&client, 42);

    assert!(me.activities(&CollectionQuery::all()).await.is_err());
    let retried = me.activities(&CollectionQuery::all()).await.unwrap();

    assert_eq!(retried.len(), 1);
    assert_eq!(transport.call_count(Method::Get, "athlete/activities"), 2);
}
