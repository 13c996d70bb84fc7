// ABOUTME: End-to-end walks through the object graph via the client facade
// ABOUTME: Lazy detail fetches, page-by-page accumulation and rate-limit reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use serde_json::json;
use strava_graph::test_utils::ScriptedTransport;
use strava_graph::{CollectionQuery, EntityId, Fidelity, Method, StravaClient, Usage};

use common::scripted;

#[tokio::test]
async fn test_athlete_details_are_fetched_lazily() {
    let (transport, client) = scripted(ScriptedTransport::new().on_get(
        "athletes/42",
        json!({"id": 42, "resource_state": 3, "firstname": "Ada", "city": "Lyon"}),
    ));
    let strava = StravaClient::new(client);

    let athlete = strava.athlete(42_u64).unwrap();
    assert_eq!(athlete.fidelity_state(), Fidelity::Meta);
    assert_eq!(transport.total_calls(), 0);

    let detailed = athlete.get_details().await.unwrap();

    assert!(Arc::ptr_eq(&athlete, &detailed));
    assert!(athlete.is_detailed());
    assert_eq!(athlete.firstname().as_deref(), Some("Ada"));
    assert_eq!(athlete.str_attr("city").as_deref(), Some("Lyon"));
    assert_eq!(transport.call_count(Method::Get, "athletes/42"), 1);
}

#[tokio::test]
async fn test_pages_accumulate_into_one_identity_map() {
    let (transport, client) = scripted(
        ScriptedTransport::new()
            .on_get("athlete", json!({"id": 42, "resource_state": 3}))
            .on_get(
                "athlete/activities",
                json!([{"id": 1, "name": "one"}, {"id": 2, "name": "two"}]),
            )
            .on_get(
                "athlete/activities",
                json!([{"id": 2, "name": "two, renamed"}, {"id": 3, "name": "three"}]),
            ),
    );
    let strava = StravaClient::new(client);
    let me = strava.current_athlete().await.unwrap();

    let page_one = me.activities(&CollectionQuery::page(1)).await.unwrap();
    let page_two = me.activities(&CollectionQuery::page(2)).await.unwrap();
    let everything = me.activities(&CollectionQuery::all()).await.unwrap();

    assert_eq!(transport.call_count(Method::Get, "athlete/activities"), 2);
    let ids: Vec<_> = everything
        .iter()
        .filter_map(|a| a.id().map(EntityId::to_string))
        .collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert!(Arc::ptr_eq(&page_one[1], &page_two[0]));
    assert_eq!(page_one[1].name().as_deref(), Some("two, renamed"));
}

#[tokio::test]
async fn test_walk_from_activity_to_segment_leaderboard() {
    let (transport, client) = scripted(
        ScriptedTransport::new()
            .on_get(
                "activities/1",
                json!({
                    "id": 1,
                    "resource_state": 3,
                    "segment_efforts": [{"id": 10, "segment": {"id": 500, "name": "Col"}}],
                }),
            )
            .on_get(
                "segments/500/leaderboard",
                json!({"entries": [{"effort_id": 10, "rank": 1, "athlete_name": "Ada"}]}),
            ),
    );
    let strava = StravaClient::new(client);

    let activity = strava.activity(1_u64).unwrap().ensure_detailed().await.unwrap();
    let segment = activity.segment_efforts()[0].segment().unwrap();
    let standings = segment
        .leaderboard()
        .unwrap()
        .get_standings(&CollectionQuery::all())
        .await
        .unwrap();

    assert_eq!(segment.name().as_deref(), Some("Col"));
    assert_eq!(standings[0].athlete_name().as_deref(), Some("Ada"));
    assert_eq!(transport.total_calls(), 2);
}

#[tokio::test]
async fn test_usage_reflects_transport() {
    let usage = Usage {
        recent_limit: 600,
        daily_limit: 30_000,
        recent_usage: 150,
        daily_usage: 300,
    };
    let (_, client) = scripted(ScriptedTransport::new().with_usage(usage));
    let strava = StravaClient::new(client);

    let reported = strava.usage().unwrap();

    assert_eq!(reported, usage);
    assert!((reported.recent_pct() - 0.25).abs() < f64::EPSILON);
    assert!(!reported.is_exhausted());
}

#[test]
fn test_meta_constructors_share_the_transport() {
    let (_, client) = scripted(ScriptedTransport::new());
    let strava = StravaClient::new(Arc::clone(&client));

    let club = strava.club(5_u64).unwrap();
    let gear = strava.gear("b12345").unwrap();

    assert!(Arc::ptr_eq(club.client(), strava.transport()));
    assert_eq!(gear.id().map(EntityId::as_str), Some("b12345"));
    assert_eq!(gear.fidelity_state(), Fidelity::Meta);
}
