//! Logging infrastructure
//!
//! Structured logging via the `tracing` crate: configurable level and
//! format, stderr/stdout/file output, one-time global initialization.

use once_cell::sync::OnceCell;
use tracing::Level;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with timestamps
    Pretty,
    /// Compact format for production
    Compact,
    /// JSON format for structured logging
    Json,
}

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// File with daily rotation
    File { directory: String, prefix: String },
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: LogFormat,
    /// Output destination
    pub output: LogOutput,
    /// Custom filter directives (e.g. "pynamelist=debug")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            output: LogOutput::Stderr,
            filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Build a config from environment variables:
    /// `PYNAMELIST_LOG` (level or filter directives),
    /// `PYNAMELIST_LOG_FORMAT` (pretty/compact/json),
    /// `PYNAMELIST_LOG_FILE` (directory for rotated files).
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("PYNAMELIST_LOG") {
            match value.to_lowercase().as_str() {
                "trace" => config.level = Level::TRACE,
                "debug" => config.level = Level::DEBUG,
                "info" => config.level = Level::INFO,
                "warn" => config.level = Level::WARN,
                "error" => config.level = Level::ERROR,
                _ => config.filter = Some(value),
            }
        }

        if let Ok(value) = std::env::var("PYNAMELIST_LOG_FORMAT") {
            config.format = match value.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }

        if let Ok(directory) = std::env::var("PYNAMELIST_LOG_FILE") {
            config.output = LogOutput::File {
                directory,
                prefix: "pynamelist".to_string(),
            };
        }

        config
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    match &config.filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(config.level.to_string().to_lowercase()),
    }
}

/// Initialize the global logging system. Subsequent calls are no-ops.
///
/// Returns a `WorkerGuard` that must be kept alive for the duration of the
/// program so buffered logs are flushed on exit.
pub fn init(config: LogConfig) -> Option<WorkerGuard> {
    if INITIALIZED.set(()).is_err() {
        return None;
    }

    let filter = build_filter(&config);

    let (writer, guard) = match &config.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogOutput::File { directory, prefix } => {
            tracing_appender::non_blocking(rolling::daily(directory, prefix))
        }
    };

    match config.format {
        LogFormat::Pretty => {
            let layer = fmt::layer().with_writer(writer).pretty().with_filter(filter);
            tracing_subscriber::registry().with(layer).init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer().with_writer(writer).compact().with_filter(filter);
            tracing_subscriber::registry().with(layer).init();
        }
        LogFormat::Json => {
            let layer = fmt::layer().with_writer(writer).json().with_filter(filter);
            tracing_subscriber::registry().with(layer).init();
        }
    }

    Some(guard)
}

/// Initialize from environment variables.
pub fn init_from_env() -> Option<WorkerGuard> {
    init(LogConfig::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.output, LogOutput::Stderr);
    }

    #[test]
    fn builder_chain() {
        let config = LogConfig::new()
            .with_level(Level::DEBUG)
            .with_format(LogFormat::Json)
            .with_filter("pynamelist=trace");
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter.as_deref(), Some("pynamelist=trace"));
    }
}
