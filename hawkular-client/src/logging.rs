//! Logging utilities and configuration for the client.
//!
//! The client only emits `tracing` events; installing a subscriber is left to
//! the application. [`setup`] offers a ready-made one.

use tracing::Level;

/// Per-client logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for request logging
    pub base_level: Level,
    /// Whether to log request bodies at debug level
    pub log_payloads: bool,
    /// Maximum length for logged bodies and error messages
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_payloads: false,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_payloads: true,
            max_field_length: 1024,
        }
    }

    /// Creates a minimal configuration for production with lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_payloads: false,
            max_field_length: 128,
        }
    }
}

/// Truncates a string to the maximum field length if needed.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Subscriber installation for applications and the demos.
pub mod setup {
    use std::str::FromStr;

    use crate::error::{MetricsError, Result};

    /// Environment variable selecting [`LogFormat`].
    pub const LOG_FORMAT_ENV: &str = "HAWKULAR_LOG_FORMAT";

    /// Output format of the installed subscriber.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub enum LogFormat {
        #[default]
        Text,
        Json,
    }

    impl FromStr for LogFormat {
        type Err = MetricsError;

        fn from_str(s: &str) -> Result<Self> {
            match s.trim().to_ascii_lowercase().as_str() {
                "text" | "plain" => Ok(Self::Text),
                "json" => Ok(Self::Json),
                other => Err(MetricsError::configuration(format!(
                    "Unknown log format '{other}', expected 'text' or 'json'"
                ))),
            }
        }
    }

    /// Filter directives and format for [`init_logging`].
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// `EnvFilter` directives, used when `RUST_LOG` is unset
        pub directives: String,
        pub format: LogFormat,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                directives: "info,hawkular_client=debug".to_string(),
                format: LogFormat::Text,
            }
        }
    }

    impl LoggingConfig {
        /// Everything at debug, as text.
        pub fn development() -> Self {
            Self {
                directives: "debug".to_string(),
                ..Self::default()
            }
        }

        /// Rejections and connection failures only, as JSON lines.
        pub fn production() -> Self {
            Self {
                directives: "warn,hawkular_client=info".to_string(),
                format: LogFormat::Json,
            }
        }

        /// Starts from `base` and applies [`LOG_FORMAT_ENV`] when it is set.
        pub fn from_env(base: Self) -> Result<Self> {
            match std::env::var(LOG_FORMAT_ENV) {
                Ok(format) => Ok(base.with_format(format.parse()?)),
                Err(_) => Ok(base),
            }
        }

        pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
            self.directives = directives.into();
            self
        }

        pub fn with_format(mut self, format: LogFormat) -> Self {
            self.format = format;
            self
        }
    }

    /// Installs the process-wide `tracing` subscriber.
    ///
    /// `RUST_LOG` wins over the configured directives when it is set. Fails
    /// with [`MetricsError::Configuration`] on bad directives or when a
    /// subscriber is already installed.
    ///
    /// ```rust,no_run
    /// use hawkular_client::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(&LoggingConfig::production()).unwrap();
    /// ```
    pub fn init_logging(config: &LoggingConfig) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&config.directives).map_err(|e| {
                MetricsError::configuration(format!(
                    "Invalid log directives '{}': {e}",
                    config.directives
                ))
            })?,
        };

        let layer = match config.format {
            LogFormat::Text => tracing_subscriber::fmt::layer().boxed(),
            LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
            .map_err(|e| MetricsError::configuration(format!("Failed to install subscriber: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::setup::{init_logging, LogFormat, LoggingConfig};
    use super::*;
    use crate::error::MetricsError;

    #[test]
    fn test_log_config_presets() {
        let config = LogConfig::default();
        assert_eq!(config.base_level, Level::INFO);
        assert!(!config.log_payloads);
        assert_eq!(config.max_field_length, 256);

        let config = LogConfig::verbose();
        assert!(config.log_payloads);
        assert_eq!(config.max_field_length, 1024);

        let config = LogConfig::production();
        assert_eq!(config.base_level, Level::WARN);
        assert_eq!(config.max_field_length, 128);
    }

    #[test]
    fn test_truncate_field() {
        assert_eq!(truncate_field("hello", 10), "hello");
        let long_text = "this is a very long text that should be truncated";
        assert_eq!(truncate_field(long_text, 10), "this is a ...(truncated)");
        // never splits a multi-byte character
        assert_eq!(truncate_field("ääää", 3), "ä...(truncated)");
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Text ".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("plain".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!(matches!(
            "yaml".parse::<LogFormat>(),
            Err(MetricsError::Configuration { .. })
        ));
    }

    #[test]
    fn test_logging_presets() {
        let config = LoggingConfig::default();
        assert_eq!(config.directives, "info,hawkular_client=debug");
        assert_eq!(config.format, LogFormat::Text);

        let config = LoggingConfig::production();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(
            config.with_directives("error").directives,
            "error"
        );
    }

    #[test]
    fn test_invalid_directives_are_configuration_errors() {
        // fails on the directives before touching the global subscriber
        std::env::remove_var("RUST_LOG");
        let config = LoggingConfig::default().with_directives("hawkular_client=loud");
        assert!(matches!(
            init_logging(&config),
            Err(MetricsError::Configuration { .. })
        ));
    }
}
