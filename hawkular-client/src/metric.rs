//! Datapoints, metric records and metric types.
//!
//! These are plain value types. A [`Datapoint`] is one sample, a
//! [`MetricRecord`] groups samples under a metric id and type. Neither holds a
//! reference to the client that eventually submits it.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MetricsError;

/// Segment used for endpoints that accept every metric type.
pub const GENERIC_METRICS_SEGMENT: &str = "metrics";

/// The kind of time series a metric belongs to.
///
/// Each variant maps to a fixed URL path segment and a short display name.
/// The generic "metrics" collection is not a variant: URL builders take an
/// `Option<MetricType>` and use `None` for it, so it can never end up on an
/// outbound record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricType {
    #[serde(rename = "gauges")]
    Gauge,
    #[serde(rename = "availability")]
    Availability,
    #[serde(rename = "counters")]
    Counter,
    #[serde(rename = "strings")]
    String,
}

impl MetricType {
    /// All metric types, in routing order.
    pub const ALL: [MetricType; 4] = [
        MetricType::Gauge,
        MetricType::Availability,
        MetricType::Counter,
        MetricType::String,
    ];

    /// The URL path segment for this type.
    pub fn path_segment(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauges",
            MetricType::Availability => "availability",
            MetricType::Counter => "counters",
            MetricType::String => "strings",
        }
    }

    /// The short display name for this type.
    pub fn short_name(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Availability => "availability",
            MetricType::Counter => "counter",
            MetricType::String => "string",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for MetricType {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricType::ALL
            .into_iter()
            .find(|t| t.path_segment() == s || t.short_name() == s)
            .ok_or_else(|| MetricsError::invalid_request(format!("Unknown metric type: '{s}'")))
    }
}

/// Returns the current time as milliseconds since the Unix epoch.
pub fn time_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A single sample of a metric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Opaque value, only required to be JSON
    pub value: Value,
    /// Present whenever the caller supplied tags, even an empty set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
}

impl Datapoint {
    /// Creates a datapoint stamped with the current time and no tags.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            timestamp: time_millis(),
            value: value.into(),
            tags: None,
        }
    }

    /// Overrides the timestamp.
    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Replaces the tag set.
    pub fn with_tags<K, V>(mut self, tags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.tags = Some(
            tags.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Adds a single tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

impl From<Datapoint> for Vec<Datapoint> {
    fn from(datapoint: Datapoint) -> Self {
        vec![datapoint]
    }
}

/// Creates a datapoint.
///
/// A missing `timestamp` is filled with [`time_millis`]. `tags` is attached
/// as given, so `Some(empty)` still renders an empty `tags` object on the wire.
///
/// NaN and infinite floats convert to a null value, which submission rejects
/// with [`MetricsError::InvalidRequest`].
pub fn create_datapoint(
    value: impl Into<Value>,
    timestamp: Option<i64>,
    tags: Option<HashMap<String, String>>,
) -> Datapoint {
    Datapoint {
        timestamp: timestamp.unwrap_or_else(time_millis),
        value: value.into(),
        tags,
    }
}

/// A named metric series with one or more datapoints, ready for `put`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<MetricType>,
    pub id: String,
    pub data: Vec<Datapoint>,
}

impl MetricRecord {
    pub fn new(metric_type: MetricType, id: impl Into<String>, data: impl Into<Vec<Datapoint>>) -> Self {
        Self {
            metric_type: Some(metric_type),
            id: id.into(),
            data: data.into(),
        }
    }
}

impl From<MetricRecord> for Vec<MetricRecord> {
    fn from(record: MetricRecord) -> Self {
        vec![record]
    }
}

/// Wraps one datapoint or a sequence of datapoints into a submittable record.
///
/// Neither the id format nor the data length is checked here; `put` does that
/// before anything is sent.
pub fn create_metric(
    metric_type: MetricType,
    metric_id: impl Into<String>,
    data: impl Into<Vec<Datapoint>>,
) -> MetricRecord {
    MetricRecord::new(metric_type, metric_id, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_type_segments_and_names() {
        let expected = [
            (MetricType::Gauge, "gauges", "gauge"),
            (MetricType::Availability, "availability", "availability"),
            (MetricType::Counter, "counters", "counter"),
            (MetricType::String, "strings", "string"),
        ];
        for (metric_type, segment, short) in expected {
            assert_eq!(metric_type.path_segment(), segment);
            assert_eq!(metric_type.short_name(), short);
            assert_eq!(metric_type.to_string(), short);
            assert_eq!(segment.parse::<MetricType>().unwrap(), metric_type);
            assert_eq!(short.parse::<MetricType>().unwrap(), metric_type);
        }
        assert!("metrics".parse::<MetricType>().is_err());
        assert!("rate".parse::<MetricType>().is_err());
    }

    #[test]
    fn test_datapoint_defaults_timestamp_to_now() {
        let before = time_millis();
        let dp = create_datapoint(1.5, None, None);
        let after = time_millis();
        assert!(dp.timestamp >= before && dp.timestamp <= after);
        assert_eq!(dp.value, json!(1.5));
        assert!(dp.tags.is_none());
    }

    #[test]
    fn test_datapoint_keeps_explicit_timestamp() {
        let dp = create_datapoint("up", Some(1_429_000_000_000), None);
        assert_eq!(dp.timestamp, 1_429_000_000_000);
    }

    #[test]
    fn test_empty_tags_are_rendered() {
        let dp = create_datapoint(3, Some(10), Some(HashMap::new()));
        let json = serde_json::to_value(&dp).unwrap();
        assert_eq!(json, json!({"timestamp": 10, "value": 3, "tags": {}}));

        let dp = create_datapoint(3, Some(10), None);
        let json = serde_json::to_value(&dp).unwrap();
        assert_eq!(json, json!({"timestamp": 10, "value": 3}));
    }

    #[test]
    fn test_non_finite_floats_have_no_json_value() {
        assert!(create_datapoint(f64::NAN, Some(1), None).value.is_null());
        assert!(Datapoint::new(f64::INFINITY).value.is_null());
        assert!(!create_datapoint(0.0, Some(1), None).value.is_null());
    }

    #[test]
    fn test_datapoint_builder() {
        let dp = Datapoint::new(true)
            .at(42)
            .with_tag("host", "web-1")
            .with_tag("dc", "east");
        assert_eq!(dp.timestamp, 42);
        let tags = dp.tags.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags["host"], "web-1");
    }

    #[test]
    fn test_single_datapoint_is_wrapped() {
        let dp = create_datapoint(7, Some(1), None);
        let single = create_metric(MetricType::Counter, "requests", dp.clone());
        let listed = create_metric(MetricType::Counter, "requests", vec![dp]);
        assert_eq!(single, listed);
        assert_eq!(single.data.len(), 1);
    }

    #[test]
    fn test_record_wire_format() {
        let record = create_metric(
            MetricType::Gauge,
            "cpu.load",
            create_datapoint(0.75, Some(1000), None),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "gauges",
                "id": "cpu.load",
                "data": [{"timestamp": 1000, "value": 0.75}]
            })
        );
    }

    #[test]
    fn test_record_without_type_deserializes() {
        let record: MetricRecord =
            serde_json::from_str(r#"{"id":"x","data":[{"timestamp":1,"value":2}]}"#).unwrap();
        assert!(record.metric_type.is_none());
        assert_eq!(record.data[0].value, json!(2));
    }
}
