//! The fetch/mail loop.
//!
//! # States
//! - Running: waiting on quit, reload and the poll deadline
//! - Terminated: a quit request was served or a mail was attempted
//!
//! # Transitions
//! ```text
//! quit pending      → Terminated (exit.)
//! reload pending    → Running, settings replaced or kept, deadline untouched
//! deadline elapsed  → fetch
//!     fetch failed  → Running, deadline = now + interval
//!     fetch ok      → mail → Terminated (mail sent. | mail error)
//! ```
//!
//! # Design Decisions
//! - Biased select: quit, then reload, then the deadline
//! - At most one mail per loop; no fetch after a successful fetch

use std::fmt;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

use crate::config::{ConfigStore, Settings};
use crate::lifecycle::control::Requests;
use crate::mail::{Mail, MailError};
use crate::poller::fetch::Fetch;

/// Stand-in deadline for intervals that do not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `now + interval`, saturating at [`FAR_FUTURE`] instead of overflowing.
fn next_deadline(interval: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(interval).unwrap_or_else(|| now + FAR_FUTURE)
}

/// How the loop ended.
#[derive(Debug)]
pub enum Outcome {
    /// A quit request was served.
    Quit,
    /// The sentinel was seen and the mail was accepted.
    MailSent,
    /// The sentinel was seen but the mail failed.
    MailFailed(MailError),
}

impl Outcome {
    /// Whether the process should report success.
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::MailFailed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Quit => write!(f, "exit."),
            Outcome::MailSent => write!(f, "mail sent."),
            Outcome::MailFailed(e) => write!(f, "{}", e),
        }
    }
}

/// Loop-owned state.
pub struct PollLoop<F, M> {
    settings: Settings,
    store: ConfigStore,
    requests: Requests,
    fetcher: F,
    mailer: M,
    deadline: Instant,
}

impl<F: Fetch, M: Mail> PollLoop<F, M> {
    /// Create the loop. The first fetch happens one interval from now.
    pub fn new(
        settings: Settings,
        store: ConfigStore,
        requests: Requests,
        fetcher: F,
        mailer: M,
    ) -> Self {
        let deadline = next_deadline(settings.interval);
        Self {
            settings,
            store,
            requests,
            fetcher,
            mailer,
            deadline,
        }
    }

    /// Settings currently in use.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// When the next fetch is due.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Run until quit or until a mail has been attempted.
    pub async fn run(mut self) -> Outcome {
        tracing::info!(
            url = %self.settings.url,
            interval = ?self.settings.interval,
            "Poll loop started"
        );

        loop {
            if let Some(outcome) = self.step().await {
                return outcome;
            }
        }
    }

    /// Wait for the next event and handle it.
    ///
    /// Returns `Some` once the loop is finished.
    pub async fn step(&mut self) -> Option<Outcome> {
        tokio::select! {
            biased;

            Some(()) = self.requests.quit.recv() => {
                tracing::info!("Quit requested");
                Some(Outcome::Quit)
            }
            Some(()) = self.requests.reload.recv() => {
                self.reload();
                None
            }
            _ = sleep_until(self.deadline) => self.poll().await,
        }
    }

    fn reload(&mut self) {
        match self.store.load() {
            Ok(settings) => {
                self.settings = settings;
                tracing::info!(
                    url = %self.settings.url,
                    interval = ?self.settings.interval,
                    "Using configuration"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    url = %self.settings.url,
                    "Not using new config, keeping current configuration"
                );
            }
        }
    }

    async fn poll(&mut self) -> Option<Outcome> {
        if let Err(e) = self.fetcher.fetch(&self.settings.url).await {
            tracing::warn!(
                url = %self.settings.url,
                error = %e,
                "Fetch failed, retrying next cycle"
            );
            self.deadline = next_deadline(self.settings.interval);
            return None;
        }

        tracing::info!(url = %self.settings.url, "Fetch succeeded");

        match self.mailer.send(&self.settings.mail).await {
            Ok(()) => Some(Outcome::MailSent),
            Err(e) => Some(Outcome::MailFailed(e)),
        }
    }
}
