//! Core error types for `tvecheck`.

use thiserror::Error;

/// Core error type for `tvecheck` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A channel number that is empty or malformed.
    #[error("Invalid channel number: {0:?}")]
    InvalidChannelNumber(String),

    /// A timestamp that is neither RFC 3339 nor a plain local date-time.
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}
