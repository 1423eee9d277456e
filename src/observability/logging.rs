//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Write every event to the log file, each line prefixed with the pid
//! - Mirror warnings and errors to stderr
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via CLI and `RUST_LOG`
//! - The log file is appended to, never truncated

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File name of the log, relative to the home directory.
pub const LOG_FILE_NAME: &str = "polldot.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Timer that prefixes each line with `[pid] ` before the timestamp.
#[derive(Debug, Clone)]
pub struct PidTimer<T = SystemTime> {
    pid: u32,
    inner: T,
}

impl PidTimer {
    pub fn new() -> Self {
        Self {
            pid: std::process::id(),
            inner: SystemTime,
        }
    }
}

impl Default for PidTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FormatTime> FormatTime for PidTimer<T> {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "[{}] ", self.pid)?;
        self.inner.format_time(w)
    }
}

/// Open (or create) the log file for appending.
pub fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Build the subscriber: file layer plus a stderr layer for warnings.
pub fn subscriber(
    file: File,
    filter: EnvFilter,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(PidTimer::new());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
}

/// Install the global subscriber writing to `path`.
pub fn init(path: &Path, level: &str) -> Result<(), LoggingError> {
    let file = open_log_file(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| format!("polldot={level}").into());

    subscriber(file, filter).try_init()?;
    Ok(())
}
