//! Mail delivery.
//!
//! [`MailTransport`] is the seam between report rendering and the network.
//! [`SmtpMailer`] is the real implementation: STARTTLS submission with
//! login credentials, one connection per message.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::MailConfig;
use crate::error::NotifyError;
use crate::report::Report;

/// Default SMTP command timeout.
pub const DEFAULT_SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A rendered mail ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Subject line.
    pub subject: String,
    /// Plain-text alternative.
    pub text: String,
    /// HTML alternative.
    pub html: String,
}

impl From<&Report> for OutgoingMail {
    fn from(report: &Report) -> Self {
        Self {
            subject: report.subject(),
            text: report.text(),
            html: report.html(),
        }
    }
}

/// Something that can deliver a mail.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Delivers one mail.
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), NotifyError>;
}

/// SMTP delivery via STARTTLS.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: MailConfig,
    timeout: Duration,
}

impl SmtpMailer {
    /// Creates a mailer for `config`.
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            timeout: DEFAULT_SMTP_TIMEOUT,
        }
    }

    /// Sets the SMTP command timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the multipart message without sending it.
    ///
    /// # Errors
    ///
    /// Invalid sender or recipient address, or message assembly failure.
    pub fn build_message(&self, mail: &OutgoingMail) -> Result<Message, NotifyError> {
        let from = parse_mailbox(&self.config.sender)?;
        let to = parse_mailbox(&self.config.recipient)?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                mail.text.clone(),
                mail.html.clone(),
            ))?;
        Ok(message)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let credentials =
            Credentials::new(self.config.sender.clone(), self.config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)?
            .port(self.config.port)
            .credentials(credentials)
            .timeout(Some(self.timeout))
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    #[instrument(skip(self, mail), fields(server = %self.config.server, port = self.config.port))]
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        let message = self.build_message(mail)?;
        let transport = self.transport()?;

        let response = transport.send(message).await?;
        debug!(code = %response.code(), "SMTP server accepted message");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|source| NotifyError::Address {
            address: address.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailConfig {
        MailConfig {
            server: "smtp.example.com".to_string(),
            port: 587,
            sender: "dvr@example.com".to_string(),
            password: "hunter2".to_string(),
            recipient: "me@example.com".to_string(),
        }
    }

    fn mail() -> OutgoingMail {
        OutgoingMail {
            subject: "Channels DVR TVE Test Results - 1 Failed, 0 Passed".to_string(),
            text: "plain body".to_string(),
            html: "<p>html body</p>".to_string(),
        }
    }

    #[test]
    fn test_build_message_is_multipart_alternative() {
        let message = SmtpMailer::new(config()).build_message(&mail()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: dvr@example.com"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("Subject: Channels DVR TVE Test Results - 1 Failed, 0 Passed"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("plain body"));
    }

    #[test]
    fn test_bad_recipient_is_rejected() {
        let mut config = config();
        config.recipient = "not an address".to_string();

        let err = SmtpMailer::new(config).build_message(&mail()).unwrap_err();
        assert!(matches!(err, NotifyError::Address { .. }));
        assert!(err.to_string().contains("not an address"));
    }
}
