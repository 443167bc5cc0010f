//! Error types for the ShiiruMax API test battery

use thiserror::Error;

/// Main error type for the test battery
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("Transport error while {context}: {source}")]
    Transport {
        source: TransportError,
        context: String,
    },

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: String,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Run aborted: {case} failed")]
    Aborted { case: String },
}

/// Failures that prevent a request from completing at all.
///
/// A status mismatch is not a transport error; it is a normal response the
/// check primitive compares against its expectation.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {duration_ms}ms")]
    RequestTimeout { duration_ms: u64 },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("HTTP client error: {message}")]
    Client { message: String },
}

impl TransportError {
    /// Wrap into a [`ProbeError`] naming what was being attempted
    pub fn during(self, context: impl Into<String>) -> ProbeError {
        ProbeError::Transport {
            source: self,
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Type alias for the main result type used throughout the library
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Logging configuration and initialization
pub mod logging {
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    use std::env;

    /// Logging output format
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LogFormat {
        Human,
        Json,
    }

    /// Logging output destination
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LogOutput {
        Stdout,
        Stderr,
    }

    /// Logging configuration
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        pub level: Level,
        pub format: LogFormat,
        pub output: LogOutput,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            // The progress log owns stdout; diagnostics go to stderr and stay quiet.
            Self {
                level: Level::WARN,
                format: LogFormat::Human,
                output: LogOutput::Stderr,
            }
        }
    }

    /// Filter at `level`, honouring `RUST_LOG`; HTTP client internals stay at warn
    pub(crate) fn build_filter(level: Level) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
        Ok(EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
            .add_directive("hyper=warn".parse()?)
            .add_directive("reqwest=warn".parse()?))
    }

    /// Initialize structured logging with the given configuration
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = build_filter(config.level)?;

        let registry = tracing_subscriber::registry()
            .with(env_filter);

        match config.format {
            LogFormat::Human => {
                let fmt_layer = fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).try_init()?,
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).try_init()?,
                }
            }
            LogFormat::Json => {
                let fmt_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).try_init()?,
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).try_init()?,
                }
            }
        }

        Ok(())
    }

    /// Build a logging configuration from `SHIIRUMAX_LOG_*` variables
    pub fn config_from_env() -> LoggingConfig {
        let defaults = LoggingConfig::default();

        let level = env::var("SHIIRUMAX_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse::<Level>().ok())
            .unwrap_or(defaults.level);

        let format = match env::var("SHIIRUMAX_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };

        let output = match env::var("SHIIRUMAX_LOG_OUTPUT").as_deref() {
            Ok("stdout") => LogOutput::Stdout,
            _ => LogOutput::Stderr,
        };

        LoggingConfig { level, format, output }
    }

    /// Initialize logging with environment-based configuration
    pub fn init_from_env() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        init_logging(config_from_env())
    }
}
