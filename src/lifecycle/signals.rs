//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGHUP, SIGINT, SIGTERM, SIGUSR1)
//! - Translate signals to poll loop requests
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers config reload, not shutdown
//! - SIGINT, SIGTERM and SIGUSR1 all request an orderly exit
//! - Posting never blocks; repeated signals coalesce while one is pending

use crate::lifecycle::control::{Posted, Request, RequestSender};

#[cfg(unix)]
pub use unix::{request_for, signal_name, SignalListener};

#[cfg(not(unix))]
pub use fallback::SignalListener;

fn forward(sender: &RequestSender, request: Request) {
    match sender.post(request) {
        Posted::Queued | Posted::Coalesced => {}
        Posted::Closed => tracing::debug!(?request, "Poll loop gone, request dropped"),
    }
}

#[cfg(unix)]
mod unix {
    use std::io;

    use tokio::signal::unix::{signal, Signal, SignalKind};

    use super::forward;
    use crate::lifecycle::control::{Request, RequestSender};

    /// Map a signal to the request it stands for.
    pub fn request_for(kind: SignalKind) -> Option<Request> {
        if kind == SignalKind::hangup() {
            Some(Request::Reload)
        } else if kind == SignalKind::interrupt()
            || kind == SignalKind::terminate()
            || kind == SignalKind::user_defined1()
        {
            Some(Request::Quit)
        } else {
            None
        }
    }

    /// Human-readable name for the signals we listen to.
    pub fn signal_name(kind: SignalKind) -> &'static str {
        if kind == SignalKind::hangup() {
            "SIGHUP"
        } else if kind == SignalKind::interrupt() {
            "SIGINT"
        } else if kind == SignalKind::terminate() {
            "SIGTERM"
        } else if kind == SignalKind::user_defined1() {
            "SIGUSR1"
        } else {
            "unknown"
        }
    }

    /// Listens for OS signals and posts requests to the poll loop.
    pub struct SignalListener {
        sender: RequestSender,
        hangup: Signal,
        interrupt: Signal,
        terminate: Signal,
        user1: Signal,
    }

    impl SignalListener {
        /// Register all signal streams. Fails if any registration fails.
        pub fn install(sender: RequestSender) -> io::Result<Self> {
            Ok(Self {
                sender,
                hangup: signal(SignalKind::hangup())?,
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
                user1: signal(SignalKind::user_defined1())?,
            })
        }

        /// Translate signals until every stream has closed.
        pub async fn run(mut self) {
            tracing::info!("Waiting for signals");

            loop {
                let kind = tokio::select! {
                    Some(()) = self.hangup.recv() => SignalKind::hangup(),
                    Some(()) = self.interrupt.recv() => SignalKind::interrupt(),
                    Some(()) = self.terminate.recv() => SignalKind::terminate(),
                    Some(()) = self.user1.recv() => SignalKind::user_defined1(),
                    else => break,
                };

                tracing::info!(signal = signal_name(kind), "Received signal");
                if let Some(request) = request_for(kind) {
                    forward(&self.sender, request);
                }
            }

            tracing::warn!("All signal streams closed, signal listener stopping");
        }
    }
}

#[cfg(not(unix))]
mod fallback {
    use std::io;

    use super::forward;
    use crate::lifecycle::control::{Request, RequestSender};

    /// Ctrl-C only listener for platforms without Unix signals.
    pub struct SignalListener {
        sender: RequestSender,
    }

    impl SignalListener {
        pub fn install(sender: RequestSender) -> io::Result<Self> {
            Ok(Self { sender })
        }

        pub async fn run(self) {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                    return;
                }
                tracing::info!("Received Ctrl+C");
                forward(&self.sender, Request::Quit);
            }
        }
    }
}
