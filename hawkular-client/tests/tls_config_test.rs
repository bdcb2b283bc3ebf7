//! Tests for TLS and transport configuration.

use std::time::Duration;

use hawkular_client::prelude::*;

#[test]
fn test_client_builds_with_https_settings() {
    let config = ClientConfig::new("acme")
        .with_scheme("https")
        .with_port(8443)
        .with_accept_invalid_certs(true)
        .with_timeout(Duration::from_secs(3));

    let client = HawkularClient::new(config).expect("Failed to create client");
    assert_eq!(
        client.urls().base_url(),
        "https://localhost:8443/hawkular/metrics/"
    );
}

#[test]
fn test_unreadable_ca_file_is_configuration_error() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    // a directory cannot be read as a certificate
    let config = ClientConfig::new("acme")
        .with_scheme("https")
        .with_ca_file(temp_dir.path());

    let err = HawkularClient::new(config).unwrap_err();
    assert!(matches!(err, MetricsError::Configuration { .. }));
    assert!(err.to_string().contains("CA file"));
}

#[test]
fn test_missing_ca_file_is_configuration_error() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing-ca.pem");

    let err = HawkularClient::new(ClientConfig::new("acme").with_ca_file(&missing)).unwrap_err();
    assert!(matches!(err, MetricsError::Configuration { .. }));
}

#[test]
fn test_unsupported_scheme_is_rejected() {
    let err = HawkularClient::new(ClientConfig::new("acme").with_scheme("ftp")).unwrap_err();
    assert!(matches!(err, MetricsError::Configuration { .. }));
}
