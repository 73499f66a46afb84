//! Logging configuration shared by Podsheet binaries.
//!
//! `LogConfig` decides where diagnostics go (stderr, stdout, journald or a
//! file) and at which level. The exporter writes its report to a file and
//! `preview` writes its table to stdout, so by default only stderr receives
//! log output.
use std::{fs::OpenOptions, path::PathBuf};

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use tracing_subscriber::{
    Layer, fmt::MakeWriter, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Where log records are emitted and at which level.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// Optional file that log records are appended to.
    #[serde(default = "LogConfig::default_file_path")]
    pub file_path: Option<PathBuf>,

    #[serde(default = "LogConfig::default_emit_journald")]
    pub emit_journald: bool,

    #[serde(default = "LogConfig::default_emit_stdout")]
    pub emit_stdout: bool,

    #[serde(default = "LogConfig::default_emit_stderr")]
    pub emit_stderr: bool,

    /// Output style of the formatted layers.
    #[serde(default)]
    pub format: LogFormat,

    /// Records below this level are dropped.
    #[serde(default = "LogConfig::default_log_level")]
    #[serde_as(as = "DisplayFromStr")]
    pub level: tracing::Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: Self::default_file_path(),
            emit_journald: Self::default_emit_journald(),
            emit_stdout: Self::default_emit_stdout(),
            emit_stderr: Self::default_emit_stderr(),
            format: LogFormat::default(),
            level: Self::default_log_level(),
        }
    }
}

impl LogConfig {
    #[inline]
    #[must_use]
    pub const fn default_log_level() -> tracing::Level { tracing::Level::INFO }

    #[inline]
    #[must_use]
    pub const fn default_file_path() -> Option<PathBuf> { None }

    #[inline]
    #[must_use]
    pub const fn default_emit_journald() -> bool { false }

    #[inline]
    #[must_use]
    pub const fn default_emit_stdout() -> bool { false }

    #[inline]
    #[must_use]
    pub const fn default_emit_stderr() -> bool { true }

    /// Installs the global `tracing` subscriber described by this config.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber has already been installed.
    pub fn registry(&self) {
        let Self { emit_journald, file_path, emit_stdout, emit_stderr, format, level } = self;

        let filter_layer = tracing_subscriber::filter::LevelFilter::from_level(*level);

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(emit_journald.then(|| LogDriver::Journald.layer(*format)))
            .with(file_path.clone().map(|path| LogDriver::File(path).layer(*format)))
            .with(emit_stdout.then(|| LogDriver::Stdout.layer(*format)))
            .with(emit_stderr.then(|| LogDriver::Stderr.layer(*format)))
            .init();
    }
}

/// Formatting style for the stdout, stderr and file drivers.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LogFormat {
    /// Single-line records, suited to a terminal running a one-shot export.
    #[default]
    Compact,
    /// Multi-line records with source locations.
    Pretty,
}

#[derive(Clone, Debug)]
enum LogDriver {
    Stdout,
    Stderr,
    Journald,
    File(PathBuf),
}

impl LogDriver {
    /// Builds the layer for this driver, or `None` if the target cannot be
    /// opened (unwritable log file, no journald socket).
    #[allow(clippy::type_repetition_in_bounds)]
    fn layer<S>(self, format: LogFormat) -> Option<Box<dyn Layer<S> + Send + Sync + 'static>>
    where
        S: tracing::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        match self {
            Self::Stdout => Some(fmt_layer(format, std::io::stdout)),
            Self::Stderr => Some(fmt_layer(format, std::io::stderr)),
            Self::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path).ok()?;
                Some(fmt_layer(format, file))
            }
            Self::Journald => Some(Box::new(tracing_journald::layer().ok()?)),
        }
    }
}

#[allow(clippy::type_repetition_in_bounds)]
fn fmt_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: tracing::Subscriber,
    for<'a> S: LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Compact => Box::new(
            tracing_subscriber::fmt::layer().compact().with_target(false).with_writer(writer),
        ),
        LogFormat::Pretty => Box::new(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_writer(writer),
        ),
    }
}
