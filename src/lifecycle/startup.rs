//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve file locations
//! - Initialize logging, then load and validate configuration
//! - Start the signal listener
//! - Run the poll loop to completion
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, the loop never starts
//! - Logging first so configuration problems end up in the log file

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::loader::{home_dir, CONFIG_FILE_NAME};
use crate::config::{ConfigError, ConfigStore, IntervalPolicy};
use crate::lifecycle::control;
use crate::lifecycle::signals::SignalListener;
use crate::mail::SmtpMailer;
use crate::observability::logging::{self, LoggingError, LOG_FILE_NAME};
use crate::poller::{FetchError, HttpFetcher, Outcome, PollLoop};

/// Errors that stop the process before the poll loop runs.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] io::Error),

    #[error(transparent)]
    Fetcher(#[from] FetchError),
}

/// Process options, usually taken from the command line.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    /// Overrides `~/.polldot.json`.
    pub config_path: Option<PathBuf>,
    /// Overrides `~/polldot.log`.
    pub log_path: Option<PathBuf>,
    pub log_level: String,
    pub interval_policy: IntervalPolicy,
    pub fetch_timeout: Option<Duration>,
}

impl Default for StartupOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            log_path: None,
            log_level: "info".to_string(),
            interval_policy: IntervalPolicy::default(),
            fetch_timeout: None,
        }
    }
}

/// Where the configuration and log live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config: PathBuf,
    pub log: PathBuf,
}

impl Paths {
    /// Fill in missing paths from the home directory.
    ///
    /// `$HOME` is only required when at least one path is not given.
    pub fn resolve(config: Option<PathBuf>, log: Option<PathBuf>) -> Result<Self, ConfigError> {
        let (config, log) = match (config, log) {
            (Some(config), Some(log)) => (config, log),
            (config, log) => {
                let home = home_dir()?;
                (
                    config.unwrap_or_else(|| home.join(CONFIG_FILE_NAME)),
                    log.unwrap_or_else(|| home.join(LOG_FILE_NAME)),
                )
            }
        };
        Ok(Self { config, log })
    }
}

impl StartupError {
    /// Whether the error happened before logging was initialized.
    pub fn before_logging(&self) -> bool {
        matches!(
            self,
            StartupError::Logging(_) | StartupError::Config(ConfigError::Homeless)
        )
    }
}

/// Start everything and run until the poll loop finishes.
pub async fn run(options: StartupOptions) -> Result<Outcome, StartupError> {
    let paths = Paths::resolve(options.config_path.clone(), options.log_path.clone())?;
    logging::init(&paths.log, &options.log_level)?;

    tracing::info!(
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        "polldot started"
    );

    serve(paths, options).await.map_err(|e| {
        tracing::error!(error = %e, "Startup failed");
        e
    })
}

async fn serve(paths: Paths, options: StartupOptions) -> Result<Outcome, StartupError> {
    let store = ConfigStore::new(paths.config, options.interval_policy);
    let settings = store.load()?;

    tracing::info!(
        url = %settings.url,
        interval = ?settings.interval,
        mail_host = %settings.mail.host,
        mail_port = settings.mail.port,
        mail_to = %settings.mail.to,
        policy = %store.policy(),
        "Using configuration"
    );

    let (sender, requests) = control::channel();
    let listener = SignalListener::install(sender).map_err(StartupError::Signals)?;
    tokio::spawn(listener.run());

    let fetcher = HttpFetcher::new(options.fetch_timeout)?;
    let outcome = PollLoop::new(settings, store, requests, fetcher, SmtpMailer::new())
        .run()
        .await;

    if outcome.is_success() {
        tracing::info!(outcome = %outcome, "Poll loop finished");
    } else {
        tracing::error!(outcome = %outcome, "Poll loop finished");
    }

    Ok(outcome)
}
