// ABOUTME: Stream value objects: per-type sample series of activities, segments, efforts and routes
// ABOUTME: StreamSet keys streams by type and zips them into per-sample rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strava_graph_core::{GraphError, GraphResult, Params, Payload};
use strava_graph_transport::ClientRef;
use tracing::debug;

/// One sample series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    /// Stream type (`time`, `latlng`, `distance`, ...)
    #[serde(rename = "type")]
    pub stream_type: String,
    /// Samples
    #[serde(default)]
    pub data: Vec<Value>,
    /// Base series the samples are indexed by (`distance` or `time`)
    #[serde(default)]
    pub series_type: Option<String>,
    /// Sample count before any resolution reduction
    #[serde(default)]
    pub original_size: Option<u64>,
    /// `low`, `medium` or `high`
    #[serde(default)]
    pub resolution: Option<String>,
}

impl Stream {
    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the stream has no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at `index`
    #[must_use]
    pub fn sample(&self, index: usize) -> Option<&Value> {
        self.data.get(index)
    }
}

/// Streams of one owner keyed by type, in response order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamSet {
    streams: Vec<Stream>,
}

impl StreamSet {
    /// Decode a streams response (list of stream objects)
    ///
    /// # Errors
    ///
    /// [`GraphError::DataShape`] when the body is not a list of stream objects.
    pub fn from_value(value: Value, context: &str) -> GraphResult<Self> {
        let mut set = Self::default();
        for object in Payload::classify(value, context)?.into_objects() {
            let found = match object.get("type") {
                None => "object without type",
                Some(Value::String(_)) => "stream with malformed fields",
                Some(_) => "non-string type",
            };
            let stream: Stream = serde_json::from_value(Value::Object(object)).map_err(|err| {
                GraphError::data_shape(format!("{context}: {err}"), "stream object", found)
            })?;
            set.insert(stream);
        }
        Ok(set)
    }

    fn insert(&mut self, stream: Stream) {
        if let Some(existing) = self
            .streams
            .iter_mut()
            .find(|s| s.stream_type == stream.stream_type)
        {
            *existing = stream;
        } else {
            self.streams.push(stream);
        }
    }

    /// Stream of the given type
    #[must_use]
    pub fn get(&self, stream_type: &str) -> Option<&Stream> {
        self.streams.iter().find(|s| s.stream_type == stream_type)
    }

    /// Stream types present
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.streams.iter().map(|s| s.stream_type.as_str())
    }

    /// Whether no streams were returned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Elapsed seconds
    #[must_use]
    pub fn time(&self) -> Option<&Stream> {
        self.get("time")
    }

    /// `[lat, lng]` pairs
    #[must_use]
    pub fn latlng(&self) -> Option<&Stream> {
        self.get("latlng")
    }

    /// Distance in meters
    #[must_use]
    pub fn distance(&self) -> Option<&Stream> {
        self.get("distance")
    }

    /// Altitude in meters
    #[must_use]
    pub fn altitude(&self) -> Option<&Stream> {
        self.get("altitude")
    }

    /// Heart rate in bpm
    #[must_use]
    pub fn heartrate(&self) -> Option<&Stream> {
        self.get("heartrate")
    }

    /// Power in watts
    #[must_use]
    pub fn watts(&self) -> Option<&Stream> {
        self.get("watts")
    }

    /// Per-sample rows mapping each stream type to its sample
    ///
    /// Row count follows the first stream; shorter streams contribute `null`.
    #[must_use]
    pub fn all(&self) -> Vec<Map<String, Value>> {
        let rows = self.streams.first().map_or(0, Stream::len);
        (0..rows)
            .map(|i| {
                self.streams
                    .iter()
                    .map(|s| (s.stream_type.clone(), s.sample(i).cloned().unwrap_or(Value::Null)))
                    .collect()
            })
            .collect()
    }
}

/// Fetch `{base}/streams/{types}` and decode it
pub(crate) async fn fetch(
    client: &ClientRef,
    base: &str,
    types: &[&str],
    params: &Params,
) -> GraphResult<StreamSet> {
    let path = if types.is_empty() {
        format!("{base}/streams")
    } else {
        format!("{base}/streams/{}", types.join(","))
    };
    let value = client.get(&path, params).await?;
    let set = StreamSet::from_value(value, &path)?;
    debug!("{path}: {} streams", set.streams.len());
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_zips_streams_into_rows() {
        let set = StreamSet::from_value(
            json!([
                {"type": "time", "data": [0, 1, 2], "series_type": "distance", "original_size": 3, "resolution": "high"},
                {"type": "distance", "data": [0.0, 4.2]},
            ]),
            "streams",
        )
        .unwrap();

        let rows = set.all();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["time"], json!(1));
        assert_eq!(rows[1]["distance"], json!(4.2));
        assert_eq!(rows[2]["distance"], Value::Null);
        assert_eq!(set.time().unwrap().original_size, Some(3));
    }

    #[test]
    fn test_rejects_non_stream_objects() {
        assert!(StreamSet::from_value(json!([{"data": []}]), "streams").is_err());
        assert!(StreamSet::from_value(json!("nope"), "streams").is_err());
        assert!(StreamSet::from_value(json!([]), "streams").unwrap().is_empty());
    }

    #[test]
    fn test_shape_errors_name_the_bad_field() {
        let missing = StreamSet::from_value(json!([{"data": [1]}]), "streams").unwrap_err();
        match missing {
            GraphError::DataShape { context, found, .. } => {
                assert_eq!(found, "object without type");
                assert!(context.contains("missing field `type`"));
            }
            other => panic!("expected DataShape, got {other:?}"),
        }

        let numeric = StreamSet::from_value(json!([{"type": 4}]), "streams").unwrap_err();
        assert!(matches!(numeric, GraphError::DataShape { found: "non-string type", .. }));

        let bad_data =
            StreamSet::from_value(json!([{"type": "time", "data": 3}]), "streams").unwrap_err();
        assert!(matches!(
            bad_data,
            GraphError::DataShape { found: "stream with malformed fields", .. }
        ));
    }
}
