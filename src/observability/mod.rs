//! Tracing subscriber setup
//!
//! The library only emits `tracing` events; it never installs a subscriber.
//! Applications that want the stock setup call [`init_tracing`] once at
//! startup and keep the returned guard alive.
//!
//! ```rust,no_run
//! use onesdk::observability::{LogFormat, TracingConfig, init_tracing};
//!
//! let _guard = init_tracing(TracingConfig::default().format(LogFormat::Json))?;
//! # Ok::<(), onesdk::InvokeError>(())
//! ```

use crate::error::InvokeError;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = InvokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(InvokeError::invalid_parameter(format!(
                "Invalid log format: {other}. Valid options: text, json"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for the `onesdk` target. `RUST_LOG` overrides it when set.
    pub level: tracing::Level,
    pub format: LogFormat,
    /// Daily-rotated log file. Console (stderr) output is used when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            format: LogFormat::Text,
            log_file: None,
        }
    }
}

impl TracingConfig {
    pub fn debug() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }

    pub fn level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Read `ONESDK_LOG_LEVEL`, `ONESDK_LOG_FORMAT` and `ONESDK_LOG_FILE`.
    pub fn from_env() -> Result<Self, InvokeError> {
        let mut config = Self::default();
        if let Ok(level) = std::env::var("ONESDK_LOG_LEVEL") {
            config.level = level.parse().map_err(|_| {
                InvokeError::invalid_parameter(format!(
                    "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
                ))
            })?;
        }
        if let Ok(format) = std::env::var("ONESDK_LOG_FORMAT") {
            config.format = format.parse()?;
        }
        if let Ok(path) = std::env::var("ONESDK_LOG_FILE") {
            config.log_file = Some(PathBuf::from(path));
        }
        Ok(config)
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "onesdk={}",
                self.level.to_string().to_ascii_lowercase()
            ))
        })
    }
}

/// Install a global fmt subscriber.
///
/// Returns the file writer's guard when `log_file` is set; dropping it
/// flushes and stops the background writer. A subscriber that is already
/// installed is left in place and `Ok(None)` is returned.
pub fn init_tracing(config: TracingConfig) -> Result<Option<WorkerGuard>, InvokeError> {
    let (writer, guard, ansi) = match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .ok_or_else(|| {
                    InvokeError::invalid_parameter(format!(
                        "log file path has no file name: {}",
                        path.display()
                    ))
                })?;
            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None, true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    match result {
        Ok(()) => Ok(guard),
        Err(e) if e.to_string().contains("already been set") => Ok(None),
        Err(e) => Err(InvokeError::generic(format!(
            "Failed to initialize tracing: {e}"
        ))),
    }
}
