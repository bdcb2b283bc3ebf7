//! Shared setup for the example binaries.
//!
//! The examples read their target from the environment so they can be pointed
//! at any Hawkular Metrics instance:
//!
//! * `HAWKULAR_HOST` (default `localhost`)
//! * `HAWKULAR_PORT` (default `8080`)
//! * `HAWKULAR_TENANT` (default `demo`)
//! * `HAWKULAR_TOKEN` (optional bearer token)
//! * `HAWKULAR_LOG_FORMAT` (`text` or `json`, default `text`)

use hawkular_client::logging::setup::{init_logging, LoggingConfig};
use hawkular_client::{ClientConfig, Result};

/// Builds a client configuration from the `HAWKULAR_*` variables.
pub fn demo_config() -> ClientConfig {
    let host = std::env::var("HAWKULAR_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("HAWKULAR_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let tenant = std::env::var("HAWKULAR_TENANT").unwrap_or_else(|_| "demo".to_string());

    let config = ClientConfig::new(tenant).with_host(host).with_port(port);
    match std::env::var("HAWKULAR_TOKEN") {
        Ok(token) => config.with_token(token),
        Err(_) => config,
    }
}

/// Installs the client's subscriber, honouring `HAWKULAR_LOG_FORMAT`.
pub fn init_tracing() -> Result<()> {
    init_logging(&LoggingConfig::from_env(LoggingConfig::default())?)
}
