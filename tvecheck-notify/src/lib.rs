// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # tvecheck Notify
//!
//! Turns a scan pass into a report and mails it.
//!
//! - [`Report`] - sorted view of a pass with subject, text and HTML bodies
//! - [`MailSetup`] - all-or-nothing SMTP options
//! - [`SmtpMailer`] - STARTTLS delivery via lettre
//! - [`Notifier`] - sends a report, logging instead of failing
//!
//! ## Example
//!
//! ```ignore
//! let notifier = Notifier::from_setup(&setup);
//! let report = Report::build(
//!     &outcome.passed,
//!     &outcome.failed,
//!     |n| ledger.failure_duration(n),
//!     server.authority(),
//! );
//! notifier.notify(&report).await;
//! ```

pub mod config;
pub mod error;
pub mod mailer;
pub mod notifier;
pub mod report;

pub use config::{DEFAULT_SMTP_PORT, MailConfig, MailSetup};
pub use error::NotifyError;
pub use mailer::{DEFAULT_SMTP_TIMEOUT, MailTransport, OutgoingMail, SmtpMailer};
pub use notifier::{Delivery, Notifier};
pub use report::{FailedLine, PassedLine, Report, VERSION, escape_html};
