//! The HTTP primitive the client sends its requests through.
//!
//! [`Transport`] is the only place where bytes leave the process. It must keep
//! "the server answered" apart from "no answer at all": the former is an
//! [`HttpResponse`] whatever its status, the latter a [`TransportError`].

use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Certificate, Client, Method};
use thiserror::Error;
use tracing::debug;

use crate::client::SUCCESS_STATUSES;
use crate::config::ClientConfig;
use crate::error::{MetricsError, Result};

/// A fully built request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Body decoded as UTF-8, mostly useful in tests and logs.
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Status and body of any response the server produced.
///
/// The body of a success status is never read and stays empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failures that happen before a response exists.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS, connect, TLS handshake, timeout or send failure.
    #[error("{reason}")]
    Unreachable { reason: String },

    /// Anything else the transport ran into.
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

impl TransportError {
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::Unreachable {
            reason: reason.into(),
        }
    }
}

/// Sends a request and returns whatever the server answered.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds the underlying client from the TLS and timeout settings.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // 3xx replies are returned as is
        let mut builder = Client::builder().redirect(Policy::none());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        if let Some(path) = config.ca_file() {
            let pem = std::fs::read(path).map_err(|e| {
                MetricsError::configuration(format!(
                    "Failed to read CA file '{}': {e}",
                    path.display()
                ))
            })?;
            let certificate = Certificate::from_pem(&pem).map_err(|e| {
                MetricsError::configuration(format!(
                    "Invalid CA certificate '{}': {e}",
                    path.display()
                ))
            })?;
            builder = builder.add_root_certificate(certificate);
        }

        if config.tls().accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|e| {
            MetricsError::configuration(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        if SUCCESS_STATUSES.contains(&status) {
            return Ok(HttpResponse::new(status, String::new()));
        }

        // an unreadable body still yields the status, with an empty message
        let body = response.text().await.unwrap_or_else(|e| {
            debug!(status, error = %e, "Could not read error response body");
            String::new()
        });
        Ok(HttpResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        TransportError::unreachable(error_chain(&err))
    } else {
        TransportError::Other(Box::new(err))
    }
}

/// Joins an error and all of its sources, skipping repeated messages.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts: Vec<String> = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}
