//! Fetch error types.

use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for requests against the DVR API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// Status code returned.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// Invalid server address or URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response body was not the expected JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Probe Failure
// ============================================================================

/// Why a stream probe failed.
///
/// The `Display` text is what ends up in the failure ledger and reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    /// Stream endpoint answered with something other than 200.
    #[error("HTTP {0}")]
    Status(u16),

    /// 200 OK, but the first chunk was empty.
    #[error("Link valid but no video received")]
    NoVideo,

    /// 200 OK, but the body ended before any chunk arrived.
    #[error("No data received")]
    NoData,

    /// Connect plus first chunk took longer than the probe timeout.
    #[error("Timeout after {} waiting for stream data", format_limit(.0))]
    Timeout(Duration),

    /// Network-level failure, with the transport's own description.
    #[error("{0}")]
    Transport(String),
}

impl ProbeFailure {
    /// Converts a reqwest error, keeping the full cause chain.
    pub fn from_transport(err: &reqwest::Error, limit: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(limit)
        } else {
            Self::Transport(error_chain(err))
        }
    }
}

fn format_limit(limit: &Duration) -> String {
    if limit.subsec_millis() == 0 {
        format!("{}s", limit.as_secs())
    } else {
        format!("{}ms", limit.as_millis())
    }
}

/// Joins an error and its sources with `": "`.
///
/// reqwest's top-level message is just "error sending request for url";
/// the useful part (refused, DNS, reset) lives in the sources.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

// ============================================================================
// Scan Error
// ============================================================================

/// Error type for a scan pass.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The channel source returned nothing to scan.
    #[error("No channels to scan")]
    NoChannels,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] Inner);

    #[derive(Debug, Error)]
    #[error("inner: Connection refused")]
    struct Inner;

    #[test]
    fn test_probe_failure_messages() {
        assert_eq!(ProbeFailure::Status(503).to_string(), "HTTP 503");
        assert_eq!(
            ProbeFailure::NoVideo.to_string(),
            "Link valid but no video received"
        );
        assert_eq!(ProbeFailure::NoData.to_string(), "No data received");
        assert_eq!(
            ProbeFailure::Timeout(Duration::from_secs(30)).to_string(),
            "Timeout after 30s waiting for stream data"
        );
        assert_eq!(
            ProbeFailure::Timeout(Duration::from_millis(250)).to_string(),
            "Timeout after 250ms waiting for stream data"
        );
    }

    #[test]
    fn test_error_chain_joins_sources() {
        assert_eq!(error_chain(&Outer(Inner)), "outer: inner: Connection refused");
    }
}
