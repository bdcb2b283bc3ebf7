//! Prelude for commonly used types in hawkular-client.

pub use crate::client::{tags, HawkularClient, PutReport};
pub use crate::config::ClientConfig;
pub use crate::error::{MetricsError, Result};
pub use crate::logging::LogConfig;
pub use crate::metric::{create_datapoint, create_metric, Datapoint, MetricRecord, MetricType};
