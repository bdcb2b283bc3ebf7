//! Canonical resource URLs for the metrics service.
//!
//! All functions here are pure: the same connection parameters, metric type
//! and id always produce the same string.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::ClientConfig;
use crate::metric::{MetricType, GENERIC_METRICS_SEGMENT};

/// Everything except the RFC 3986 unreserved characters is encoded, `/` included.
const METRIC_ID_ENCODING_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes a metric id so it fits in a single path segment.
pub fn encode_metric_id(metric_id: &str) -> String {
    utf8_percent_encode(metric_id, METRIC_ID_ENCODING_SET).to_string()
}

/// Appends the datapoint submission suffix.
pub fn raw_url(url: &str) -> String {
    format!("{url}/raw")
}

/// Appends the tag endpoint suffix.
pub fn tags_suffix_url(url: &str) -> String {
    format!("{url}/tags")
}

/// Builds URLs relative to `{scheme}://{host}:{port}/{base_path}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base: String,
}

impl UrlBuilder {
    pub fn new(scheme: &str, host: &str, port: u16, base_path: &str) -> Self {
        let base_path = base_path.trim_matches('/');
        let base = if base_path.is_empty() {
            format!("{scheme}://{host}:{port}/")
        } else {
            format!("{scheme}://{host}:{port}/{base_path}/")
        };
        Self { base }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.scheme(), config.host(), config.port(), config.path())
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// URL of a metric type collection; `None` selects the generic `metrics` collection.
    pub fn type_url(&self, metric_type: impl Into<Option<MetricType>>) -> String {
        let segment = metric_type
            .into()
            .map_or(GENERIC_METRICS_SEGMENT, |t| t.path_segment());
        format!("{}{}", self.base, segment)
    }

    /// URL of a single metric series.
    pub fn metric_url(&self, metric_type: impl Into<Option<MetricType>>, metric_id: &str) -> String {
        format!("{}/{}", self.type_url(metric_type), encode_metric_id(metric_id))
    }

    /// Datapoint submission endpoint of a type collection.
    pub fn datapoints_url(&self, metric_type: impl Into<Option<MetricType>>) -> String {
        raw_url(&self.type_url(metric_type))
    }

    /// Tag endpoint of a single metric series.
    pub fn tags_url(&self, metric_type: impl Into<Option<MetricType>>, metric_id: &str) -> String {
        tags_suffix_url(&self.metric_url(metric_type, metric_id))
    }
}
