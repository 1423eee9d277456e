//! Notification mail subsystem.
//!
//! # Data Flow
//! ```text
//! poll loop (sentinel seen)
//!     → Mail::send(&MailConfig)
//!     → smtp.rs builds the message
//!     → blocking SMTP dialogue on a worker thread (resilience::timeouts)
//!     → Ok, send error, or timeout after MAIL_TIMEOUT
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt; the caller decides what a failure means
//! - The mailer is a capability passed into the poll loop so tests can swap it

pub mod smtp;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::config::MailConfig;

pub use smtp::SmtpMailer;

/// How long a mail send may take before it is abandoned.
pub const MAIL_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur while sending the notification.
#[derive(Debug, Error)]
pub enum MailError {
    /// From or To is not a valid mailbox.
    #[error("invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    /// The SMTP dialogue failed.
    #[error("{0}")]
    Send(#[from] lettre::transport::smtp::Error),

    /// The send did not finish in time.
    #[error("mail timeout: {0:?}")]
    Timeout(Duration),

    /// The send worker died before reporting.
    #[error("mail worker ended without a result")]
    Abandoned,
}

/// Something that can deliver the notification mail.
pub trait Mail {
    fn send(&self, mail: &MailConfig) -> impl Future<Output = Result<(), MailError>> + Send;
}
