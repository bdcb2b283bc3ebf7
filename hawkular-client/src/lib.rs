//! # hawkular-client
//!
//! A small client for submitting datapoints to Hawkular Metrics and for
//! replacing the tags of a metric series.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hawkular_client::prelude::*;
//!
//! # async fn example() -> hawkular_client::Result<()> {
//! let mut client = HawkularClient::new(
//!     ClientConfig::new("my-tenant")
//!         .with_host("metrics.example.com")
//!         .with_token("s3cr3t"),
//! )?;
//!
//! // a single value, stamped with the current time
//! client.push(MetricType::Gauge, "cpu.load", 0.42, None).await?;
//!
//! // a mixed batch: one POST per metric type
//! client
//!     .put(vec![
//!         create_metric(MetricType::Gauge, "mem.used", create_datapoint(512, None, None)),
//!         create_metric(MetricType::Availability, "app.up", create_datapoint("up", None, None)),
//!     ])
//!     .await?;
//!
//! // replace the tags of a series
//! client
//!     .update_metric_tags(MetricType::Gauge, "cpu.load", [("env", "prod")])
//!     .await?;
//!
//! // later calls go to another tenant
//! client.tenant("other-tenant");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`metric`**: datapoints, metric records and metric types
//! - **`url`**: canonical resource URLs with percent-encoded ids
//! - **`client`**: batching by type, headers and error classification
//! - **`transport`**: the HTTP primitive, `reqwest` by default
//! - **`config`** / **`security`**: connection parameters and credentials
//! - **`logging`**: `tracing` configuration helpers
//!
//! ## Errors
//!
//! Every failure is a [`MetricsError`]. Nothing is retried automatically, and
//! `put` is not transactional across metric types; see [`client`] for the
//! exact partial-failure behavior.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod metric;
pub mod prelude;
pub mod security;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod transport;
pub mod url;

pub use client::{GroupOutcome, HawkularClient, Payload, PutReport};
pub use config::{ClientConfig, TlsConfig};
pub use error::{MetricsError, Result};
pub use metric::{
    create_datapoint, create_metric, time_millis, Datapoint, MetricRecord, MetricType,
};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use url::UrlBuilder;
