//! Pushes a few values, replaces tags and switches tenants.
//!
//! Run with: `cargo run -p hawkular-demos --example push_metrics`

use hawkular_client::prelude::*;
use hawkular_demos::{demo_config, init_tracing};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let mut client = HawkularClient::new(demo_config())?;
    println!("Sending to {} as tenant '{}'", client.urls().base_url(), client.tenant_id());

    client.push(MetricType::Gauge, "demo.cpu.load", 0.42, None).await?;

    let now = hawkular_client::time_millis();
    client
        .put(vec![
            create_metric(
                MetricType::Gauge,
                "demo.mem.used",
                vec![
                    create_datapoint(512, Some(now - 60_000), None),
                    create_datapoint(540, Some(now), None),
                ],
            ),
            create_metric(
                MetricType::Counter,
                "demo.requests",
                create_datapoint(1_024, None, Some(tags([("route", "/api")]))),
            ),
            create_metric(
                MetricType::Availability,
                "demo.app",
                create_datapoint("up", None, None),
            ),
        ])
        .await?;

    client
        .update_metric_tags(
            MetricType::Gauge,
            "demo.cpu.load",
            [("env", "demo"), ("unit", "ratio")],
        )
        .await?;

    client.tenant("demo-secondary");
    match client.push(MetricType::String, "demo.state", "ready", None).await {
        Ok(()) => println!("Wrote to tenant '{}'", client.tenant_id()),
        Err(MetricsError::Server { status, message }) => {
            println!("Server refused the write ({status}): {message}")
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
