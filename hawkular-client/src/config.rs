//! Connection parameters for a [`crate::HawkularClient`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{MetricsError, Result};
use crate::logging::LogConfig;
use crate::security::{Credentials, SecureString};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PATH: &str = "hawkular/metrics";
pub const DEFAULT_SCHEME: &str = "http";

/// TLS settings handed to the transport unexamined.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Extra PEM root certificate to trust
    pub ca_file: Option<PathBuf>,
    /// Skip certificate verification entirely
    pub accept_invalid_certs: bool,
}

/// Configuration for a metrics client.
///
/// The tenant given here is the initial tenant. It can be swapped later with
/// [`crate::HawkularClient::tenant`], even if the tenant does not exist yet on
/// the server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    tenant_id: String,
    host: String,
    port: u16,
    path: String,
    scheme: String,
    token: Option<SecureString>,
    basic_auth: Option<(String, SecureString)>,
    tls: TlsConfig,
    timeout: Option<Duration>,
    log: LogConfig,
}

impl ClientConfig {
    /// Creates a configuration with the default connection target
    /// `http://localhost:8080/hawkular/metrics/`.
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            token: None,
            basic_auth: None,
            tls: TlsConfig::default(),
            timeout: None,
            log: LogConfig::default(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Authenticates with a bearer token. Takes priority over basic auth.
    pub fn with_token(mut self, token: impl Into<SecureString>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<SecureString>,
    ) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    pub fn with_ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls.ca_file = Some(path.into());
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.tls.accept_invalid_certs = accept;
        self
    }

    /// Request timeout applied by the default transport. None means no timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn tls(&self) -> &TlsConfig {
        &self.tls
    }

    pub fn ca_file(&self) -> Option<&Path> {
        self.tls.ca_file.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn log_config(&self) -> &LogConfig {
        &self.log
    }

    /// Resolves the credentials to use. A token wins over a username.
    pub fn credentials(&self) -> Credentials {
        if let Some(token) = &self.token {
            Credentials::Bearer(token.clone())
        } else if let Some((username, password)) = &self.basic_auth {
            Credentials::Basic {
                username: username.clone(),
                password: password.clone(),
            }
        } else {
            Credentials::None
        }
    }

    /// Checks that the connection target can form a URL.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(MetricsError::configuration("host cannot be empty"));
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(MetricsError::configuration(format!(
                "unsupported scheme '{}', expected http or https",
                self.scheme
            )));
        }
        Ok(())
    }
}
