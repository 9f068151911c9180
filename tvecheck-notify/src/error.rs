//! Notification error types.

use thiserror::Error;

/// Errors raised while building or delivering a report mail.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Sender or recipient is not a valid mailbox.
    #[error("Invalid address {address:?}: {source}")]
    Address {
        /// The offending address.
        address: String,
        /// Parser error.
        source: lettre::address::AddressError,
    },

    /// Message could not be assembled.
    #[error("Could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP connection, TLS, authentication, or delivery failed.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
