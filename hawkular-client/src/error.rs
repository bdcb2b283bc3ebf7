//! Error types for the Hawkular Metrics client.
//!
//! Every failure a submission can produce is represented by [`MetricsError`].
//! Classification happens at exactly one place (the request site in
//! [`crate::client`]), so callers can rely on the variant to decide what to do
//! next. Nothing in this crate retries on its own.

use thiserror::Error;

/// Prefix of every connection failure message.
pub const CONNECTION_ERROR_PREFIX: &str =
    "Error, could not send event(s) to the Hawkular Metrics";

/// The main error type for the client.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// A record handed to `put` does not carry a metric type.
    ///
    /// Raised before any network activity.
    #[error("Undefined MetricType for metric '{id}'")]
    InvalidMetricType {
        /// Id of the offending record
        id: String,
    },

    /// The service replied with a status outside of 200, 201 and 204.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code returned by the service
        status: u16,
        /// `errorMsg` from the JSON body, or the raw body when it is not JSON
        message: String,
    },

    /// The request never produced an HTTP response (DNS, connect, TLS, timeout).
    #[error("Error, could not send event(s) to the Hawkular Metrics: {reason}")]
    Connection {
        /// The low-level reason reported by the transport
        reason: String,
    },

    /// The request was rejected locally before it was sent.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The client could not be configured.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON encoding failed. Passed through untouched.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Any other failure raised by the transport. Passed through untouched.
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

/// A type alias for `Result<T, MetricsError>`.
pub type Result<T> = std::result::Result<T, MetricsError>;

impl MetricsError {
    /// Creates a new invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Builds a server error from a response body.
    ///
    /// The message is the `errorMsg` field when the body is a JSON object that
    /// carries one as a string, and the raw body otherwise.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json.get("errorMsg")
                    .and_then(|msg| msg.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.to_string());

        Self::Server { status, message }
    }

    /// HTTP status of a server error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The bare message of a server error, without the status prefix.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}
