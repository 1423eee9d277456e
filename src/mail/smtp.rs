//! Plain SMTP delivery.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::{SmtpTransport, Transport};

use crate::config::MailConfig;
use crate::mail::{Mail, MailError, MAIL_TIMEOUT};
use crate::resilience::timeouts::{blocking_with_deadline, DeadlineError};

/// Sends mail through the configured mailserver without TLS or auth.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    timeout: Duration,
}

impl SmtpMailer {
    pub fn new() -> Self {
        Self::with_timeout(MAIL_TIMEOUT)
    }

    /// Mailer with a custom send deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SmtpMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mail for SmtpMailer {
    async fn send(&self, mail: &MailConfig) -> Result<(), MailError> {
        let message = build_message(mail)?;
        let transport = SmtpTransport::builder_dangerous(mail.host.as_str())
            .port(mail.port)
            .build();

        tracing::info!(
            host = %mail.host,
            port = mail.port,
            to = %mail.to,
            "Sending mail"
        );

        let sent =
            blocking_with_deadline("mail-send", self.timeout, move || transport.send(&message))
                .await;

        match sent {
            Ok(Ok(response)) => {
                tracing::debug!(code = %response.code(), "Mailserver accepted message");
                Ok(())
            }
            Ok(Err(e)) => Err(MailError::Send(e)),
            Err(DeadlineError::Elapsed(limit)) => Err(MailError::Timeout(limit)),
            Err(DeadlineError::Abandoned(_)) => Err(MailError::Abandoned),
        }
    }
}

/// Assemble the text/plain notification.
pub fn build_message(mail: &MailConfig) -> Result<Message, MailError> {
    let from = parse_mailbox(&mail.from)?;
    let to = parse_mailbox(&mail.to)?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())?;

    Ok(message)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}
