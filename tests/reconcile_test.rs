// ABOUTME: Integration tests for payload reconciliation into identity maps
// ABOUTME: Identity stability, idempotent empty payloads, order preservation and atomic shape errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use serde_json::{json, Value};
use strava_graph::reconcile::{reconcile, reconcile_slot};
use strava_graph::resources::{Activity, Gear, Photo};
use strava_graph::test_utils::ScriptedTransport;
use strava_graph::{CollectionCache, EntityId, Fidelity, GraphError, Handle};

use common::scripted;

fn ids<R: strava_graph::Resource>(handles: &[Handle<R>]) -> Vec<String> {
    handles
        .iter()
        .map(|h| h.id().map(ToString::to_string).unwrap_or_default())
        .collect()
}

#[test]
fn test_same_id_resolves_to_same_handle() {
    let (_, client) = scripted(ScriptedTransport::new());
    let mut cache = CollectionCache::<Activity>::default();

    let first = reconcile(&mut cache, json!([{"id": 1, "name": "a"}]), &client, Fidelity::Summary, "t")
        .unwrap();
    let second = reconcile(&mut cache, json!({"id": 1, "name": "b"}), &client, Fidelity::Summary, "t")
        .unwrap();

    assert!(Arc::ptr_eq(&first[0], &second[0]));
    assert_eq!(cache.len(), 1);
    assert_eq!(first[0].name().as_deref(), Some("b"));
}

#[test]
fn test_string_and_numeric_ids_are_the_same_key() {
    let (_, client) = scripted(ScriptedTransport::new());
    let mut cache = CollectionCache::<Activity>::default();

    let numeric = reconcile(&mut cache, json!({"id": 5}), &client, Fidelity::Summary, "t").unwrap();
    let textual = reconcile(&mut cache, json!({"id": "5"}), &client, Fidelity::Summary, "t").unwrap();

    assert!(Arc::ptr_eq(&numeric[0], &textual[0]));
    assert!(cache.contains(&EntityId::from(5_u64)));
}

#[test]
fn test_empty_payloads_are_idempotent() {
    let (_, client) = scripted(ScriptedTransport::new());
    let mut cache = CollectionCache::<Activity>::default();
    reconcile(&mut cache, json!([{"id": 1}]), &client, Fidelity::Summary, "t").unwrap();

    for empty in [json!([]), json!({})] {
        let result = reconcile(&mut cache, empty, &client, Fidelity::Summary, "t").unwrap();
        assert!(result.is_empty());
    }
    assert_eq!(cache.ids(), &[EntityId::from(1_u64)]);
}

#[test]
fn test_result_follows_payload_order_not_cache_order() {
    let (_, client) = scripted(ScriptedTransport::new());
    let mut cache = CollectionCache::<Activity>::default();
    reconcile(&mut cache, json!([{"id": 1}, {"id": 2}]), &client, Fidelity::Summary, "t").unwrap();

    let result = reconcile(
        &mut cache,
        json!([{"id": 3}, {"id": 2}, {"id": 1}]),
        &client,
        Fidelity::Summary,
        "t",
    )
    .unwrap();

    assert_eq!(ids(&result), ["3", "2", "1"]);
    assert_eq!(ids(&cache.values()), ["1", "2", "3"]);
}

#[test]
fn test_bad_shapes_leave_cache_untouched() {
    let (_, client) = scripted(ScriptedTransport::new());
    let mut cache = CollectionCache::<Activity>::default();
    reconcile(&mut cache, json!([{"id": 1, "name": "kept"}]), &client, Fidelity::Summary, "t")
        .unwrap();

    let bad: [Value; 4] = [
        json!(42),
        Value::Null,
        json!([{"id": 2, "name": "new"}, "oops"]),
        json!([{"id": 1, "name": "changed"}, {"id": 3, "segment_efforts": "not a list"}]),
    ];
    for payload in bad {
        let err = reconcile(&mut cache, payload, &client, Fidelity::Summary, "t").unwrap_err();
        assert!(matches!(err, GraphError::DataShape { .. }), "unexpected {err:?}");
    }

    assert_eq!(ids(&cache.values()), ["1"]);
    assert_eq!(cache.values()[0].name().as_deref(), Some("kept"));
}

#[test]
fn test_nested_shape_error_names_the_key() {
    let (_, client) = scripted(ScriptedTransport::new());
    let mut cache = CollectionCache::<Activity>::default();

    let err = reconcile(
        &mut cache,
        json!({"id": 1, "gear": [{"id": "b1"}]}),
        &client,
        Fidelity::Summary,
        "activities",
    )
    .unwrap_err();

    match err {
        GraphError::DataShape {
            context,
            expected,
            found,
        } => {
            assert_eq!(context, "activities.gear");
            assert_eq!(expected, "object");
            assert_eq!(found, "list");
        }
        other => panic!("expected DataShape, got {other:?}"),
    }
    assert!(cache.is_empty());
}

#[test]
fn test_identity_less_elements_are_returned_but_not_cached() {
    let (_, client) = scripted(ScriptedTransport::new());
    let mut cache = CollectionCache::<Photo>::default();

    let result = reconcile(
        &mut cache,
        json!([{"caption": "no id"}, {"unique_id": "u-1"}, {"id": 9}]),
        &client,
        Fidelity::Summary,
        "photos",
    )
    .unwrap();

    assert_eq!(result.len(), 3);
    assert!(result[0].id().is_none());
    assert_eq!(ids(&cache.values()), ["u-1", "9"]);
}

#[test]
fn test_slot_keeps_handle_for_same_id() {
    let (_, client) = scripted(ScriptedTransport::new());
    let mut slot: Option<Handle<Gear>> = None;

    reconcile_slot(&mut slot, Some(&json!({"id": "b1", "name": "Old"})), &client, "gear").unwrap();
    let before = slot.clone().unwrap();
    reconcile_slot(&mut slot, Some(&json!({"id": "b1", "name": "New"})), &client, "gear").unwrap();
    assert!(Arc::ptr_eq(&before, slot.as_ref().unwrap()));
    assert_eq!(before.name().as_deref(), Some("New"));

    reconcile_slot(&mut slot, Some(&Value::Null), &client, "gear").unwrap();
    assert!(slot.is_some());

    reconcile_slot(&mut slot, Some(&json!({"id": "b2"})), &client, "gear").unwrap();
    assert_eq!(slot.unwrap().id().map(EntityId::as_str), Some("b2"));
}
