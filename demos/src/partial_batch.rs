//! Shows how a mixed batch can partially succeed.
//!
//! Run with: `cargo run -p hawkular-demos --example partial_batch`

use hawkular_client::prelude::*;
use hawkular_demos::{demo_config, init_tracing};
use serde_json::json;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let client = HawkularClient::new(demo_config())?;

    let batch = vec![
        create_metric(MetricType::Gauge, "demo.temperature", create_datapoint(21.5, None, None)),
        // not a number, the gauge endpoint is expected to refuse it
        create_metric(
            MetricType::Gauge,
            "demo.broken",
            create_datapoint(json!({"nested": true}), None, None),
        ),
        create_metric(MetricType::String, "demo.release", create_datapoint("1.2.3", None, None)),
    ];

    let report = client.put_each(batch).await?;
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => println!("{}: {} record(s) accepted", outcome.metric_type, outcome.records),
            Err(e) => println!("{}: {} record(s) failed: {e}", outcome.metric_type, outcome.records),
        }
    }

    if report.is_success() {
        println!("Whole batch accepted");
    }
    Ok(())
}
