//! Integration tests for the client's structured logging.

use hawkular_client::logging::LogConfig;
use hawkular_client::prelude::*;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test helper to capture structured logs
#[derive(Clone)]
struct LogCapture {
    logs: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl LogCapture {
    fn new() -> Self {
        Self {
            logs: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    fn captured(&self) -> String {
        self.logs.lock().unwrap().concat()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let s = String::from_utf8_lossy(buf).to_string();
        self.logs.lock().unwrap().push(s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_rejection_is_logged_with_tenant() {
    let capture = LogCapture::new();
    let writer = capture.clone();

    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(move || writer.clone())
        .with_env_filter("info,hawkular_client=debug")
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"errorMsg":"tenant not found"}"#),
        )
        .mount(&server)
        .await;

    let address = server.address();
    let config = ClientConfig::new("acme")
        .with_host(address.ip().to_string())
        .with_port(address.port())
        .with_log_config(LogConfig::verbose());
    let client = HawkularClient::new(config).unwrap();

    let result = client.push(MetricType::Gauge, "cpu", 0.5, Some(1000)).await;
    assert!(result.is_err());

    let logs = capture.captured();
    assert!(logs.contains("Sending request"));
    assert!(logs.contains("Request payload"));
    assert!(logs.contains("Metrics service rejected request"));
    assert!(logs.contains("tenant not found"));
    assert!(logs.contains("\"tenant\":\"acme\""));
}

#[tokio::test]
async fn test_payloads_are_not_logged_by_default() {
    let capture = LogCapture::new();
    let writer = capture.clone();

    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(move || writer.clone())
        .with_env_filter("hawkular_client=debug")
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let address = server.address();
    let client = HawkularClient::new(
        ClientConfig::new("acme")
            .with_host(address.ip().to_string())
            .with_port(address.port()),
    )
    .unwrap();

    client
        .push(MetricType::Gauge, "secret-series", 0.5, None)
        .await
        .unwrap();

    let logs = capture.captured();
    assert!(logs.contains("Request accepted"));
    assert!(!logs.contains("Request payload"));
}
