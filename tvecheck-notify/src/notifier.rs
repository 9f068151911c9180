//! Report notification.
//!
//! Mail problems never abort a pass: a missing configuration is logged and
//! skipped, a delivery failure is logged and reported back as a value.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::MailSetup;
use crate::mailer::{MailTransport, OutgoingMail, SmtpMailer};
use crate::report::Report;

/// What happened to a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Mail is not configured.
    Skipped,
    /// The transport accepted the mail.
    Sent,
    /// Delivery failed with the given error.
    Failed(String),
}

/// Sends scan reports by mail.
#[derive(Clone)]
pub struct Notifier {
    transport: Option<Arc<dyn MailTransport>>,
}

impl Notifier {
    /// A notifier that never sends.
    pub fn disabled() -> Self {
        Self { transport: None }
    }

    /// A notifier delivering through `transport`.
    pub fn with_transport(transport: Arc<dyn MailTransport>) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    /// Builds a notifier from the checked mail options.
    ///
    /// An incomplete setup is logged once and disables mail.
    pub fn from_setup(setup: &MailSetup) -> Self {
        match setup {
            MailSetup::Enabled(config) => {
                info!(
                    server = %config.server,
                    port = config.port,
                    recipient = %config.recipient,
                    "Email notifications enabled"
                );
                Self::with_transport(Arc::new(SmtpMailer::new(config.clone())))
            }
            MailSetup::Disabled => Self::disabled(),
            MailSetup::Incomplete { missing } => {
                warn!(
                    missing = %missing.join(", "),
                    "Incomplete email configuration, notifications disabled"
                );
                Self::disabled()
            }
        }
    }

    /// Returns true if a transport is configured.
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Sends `report`.
    pub async fn notify(&self, report: &Report) -> Delivery {
        let Some(transport) = &self.transport else {
            info!("Email not configured, skipping notification");
            return Delivery::Skipped;
        };

        let mail = OutgoingMail::from(report);
        match transport.deliver(&mail).await {
            Ok(()) => {
                info!(subject = %mail.subject, "Email notification sent");
                Delivery::Sent
            }
            Err(e) => {
                error!(error = %e, "Failed to send email notification");
                Delivery::Failed(e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
