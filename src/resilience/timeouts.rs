//! Timeout enforcement for blocking calls.
//!
//! # Responsibilities
//! - Run a blocking call off the async runtime
//! - Race it against a fixed deadline
//!
//! # Design Decisions
//! - The call runs on its own detached thread, not the blocking pool
//! - A call that misses its deadline is not cancelled; its result is dropped
//! - Timeout errors are distinct from the call's own errors

use std::thread;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

/// Why a blocking call produced no result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeadlineError {
    /// The deadline passed before the call returned.
    #[error("timeout after {0:?}")]
    Elapsed(Duration),

    /// The worker thread died (panicked or could not be spawned).
    #[error("worker thread '{0}' ended without a result")]
    Abandoned(String),
}

/// Run `f` on a named thread and wait at most `limit` for its result.
pub async fn blocking_with_deadline<T, F>(
    name: &str,
    limit: Duration,
    f: F,
) -> Result<T, DeadlineError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();

    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            // The receiver is gone when the deadline already passed.
            let _ = tx.send(f());
        })
        .map_err(|e| {
            tracing::error!(thread = name, error = %e, "Failed to spawn worker thread");
            DeadlineError::Abandoned(name.to_string())
        })?;

    match tokio::time::timeout(limit, rx).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(_)) => Err(DeadlineError::Abandoned(name.to_string())),
        Err(_) => {
            tracing::warn!(thread = name, limit = ?limit, "Blocking call abandoned after timeout");
            Err(DeadlineError::Elapsed(limit))
        }
    }
}
