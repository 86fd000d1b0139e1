//! Rotating-file logger construction
//!
//! Configuration wrapper around tracing-subscriber and tracing-appender:
//! consumes a fully-resolved configuration struct and installs a subscriber
//! whose output sink and encoding are selected by it. No resolution logic
//! lives here; the config values are typically supplied through bindings.

use crate::error::{FlagenvError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation as FileRotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How often the log file rolls over to a fresh file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

/// Encoding of the log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotatingLogConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub rotation: Rotation,
    /// Number of rotated files to keep; older files are pruned. `None`
    /// keeps everything.
    pub max_files: Option<usize>,
    pub format: LogFormat,
    /// Filter directive in tracing-subscriber's `EnvFilter` syntax.
    pub filter: String,
}

impl Default for RotatingLogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_prefix: "flagenv".to_string(),
            rotation: Rotation::Daily,
            max_files: None,
            format: LogFormat::Text,
            filter: "info".to_string(),
        }
    }
}

/// Build a non-blocking rotating file writer from the configuration.
///
/// The returned [`WorkerGuard`] must be held for the lifetime of the
/// program; dropping it flushes and stops the background writer.
pub fn build_rotating_writer(config: &RotatingLogConfig) -> Result<(NonBlocking, WorkerGuard)> {
    if config.file_prefix.is_empty() {
        return Err(FlagenvError::config("no log file prefix provided"));
    }
    if config.directory.as_os_str().is_empty() {
        return Err(FlagenvError::config("no log directory provided"));
    }

    let rotation = match config.rotation {
        Rotation::Minutely => FileRotation::MINUTELY,
        Rotation::Hourly => FileRotation::HOURLY,
        Rotation::Daily => FileRotation::DAILY,
        Rotation::Never => FileRotation::NEVER,
    };

    let mut builder = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(config.file_prefix.as_str());
    if let Some(max_files) = config.max_files {
        builder = builder.max_log_files(max_files);
    }

    let appender = builder
        .build(&config.directory)
        .map_err(|e| FlagenvError::logging(e.to_string()))?;

    Ok(tracing_appender::non_blocking(appender))
}

/// Install a global subscriber writing to a rotating file per the
/// configuration. Fails if a global subscriber is already set.
pub fn init_rotating_logger(config: &RotatingLogConfig) -> Result<WorkerGuard> {
    let (writer, guard) = build_rotating_writer(config)?;
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| FlagenvError::config(format!("invalid log filter '{}': {e}", config.filter)))?;

    let subscriber = tracing_subscriber::registry().with(filter);
    let init_result = match config.format {
        LogFormat::Json => subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Text => subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init(),
    };
    init_result.map_err(|e| FlagenvError::logging(e.to_string()))?;

    Ok(guard)
}
