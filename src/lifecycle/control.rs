//! Request channels between the signal listener and the poll loop.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// A request for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Re-read the configuration.
    Reload,
    /// Stop polling and exit.
    Quit,
}

/// Result of posting a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posted {
    /// The request is now pending.
    Queued,
    /// A request of the same kind was already pending.
    Coalesced,
    /// The poll loop is gone.
    Closed,
}

/// Sending half, held by the signal listener (or a test).
#[derive(Debug, Clone)]
pub struct RequestSender {
    reload: mpsc::Sender<()>,
    quit: mpsc::Sender<()>,
}

/// Receiving half, owned by the poll loop.
#[derive(Debug)]
pub struct Requests {
    pub(crate) reload: mpsc::Receiver<()>,
    pub(crate) quit: mpsc::Receiver<()>,
}

/// Create the pair of single-slot request channels.
pub fn channel() -> (RequestSender, Requests) {
    let (reload_tx, reload_rx) = mpsc::channel(1);
    let (quit_tx, quit_rx) = mpsc::channel(1);

    (
        RequestSender {
            reload: reload_tx,
            quit: quit_tx,
        },
        Requests {
            reload: reload_rx,
            quit: quit_rx,
        },
    )
}

impl RequestSender {
    /// Post a request without blocking.
    pub fn post(&self, request: Request) -> Posted {
        let tx = match request {
            Request::Reload => &self.reload,
            Request::Quit => &self.quit,
        };

        match tx.try_send(()) {
            Ok(()) => Posted::Queued,
            Err(TrySendError::Full(())) => {
                tracing::debug!(?request, "Request already pending, coalesced");
                Posted::Coalesced
            }
            Err(TrySendError::Closed(())) => Posted::Closed,
        }
    }

    pub fn request_reload(&self) -> Posted {
        self.post(Request::Reload)
    }

    pub fn request_quit(&self) -> Posted {
        self.post(Request::Quit)
    }
}
