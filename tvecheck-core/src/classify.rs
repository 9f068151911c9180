//! Failure classification for reports.
//!
//! Raw probe errors are matched against [`CLASSIFY_RULES`] top to bottom and
//! the first hit decides the [`FailureKind`]. The table is data so the
//! precedence can be read (and tested) at a glance.

use std::fmt;

/// Coarse category of a probe failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Bad HTTP status or refused connection.
    Connection,
    /// No response within the probe timeout.
    Timeout,
    /// Stream answered but carried no video.
    NoVideo,
    /// Anything else.
    Stream,
}

impl FailureKind {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connection => "Connection Error",
            Self::Timeout => "Timeout",
            Self::NoVideo => "No Video Data",
            Self::Stream => "Stream Error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One `(needle, kind)` classification rule.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyRule {
    /// Substring to look for.
    pub needle: &'static str,
    /// Whether the match is case-sensitive.
    pub case_sensitive: bool,
    /// Category assigned on match.
    pub kind: FailureKind,
}

impl ClassifyRule {
    const fn exact(needle: &'static str, kind: FailureKind) -> Self {
        Self {
            needle,
            case_sensitive: true,
            kind,
        }
    }

    const fn folded(needle: &'static str, kind: FailureKind) -> Self {
        Self {
            needle,
            case_sensitive: false,
            kind,
        }
    }

    /// Returns true if `error` contains this rule's needle.
    ///
    /// Folded needles must be written in lowercase.
    pub fn matches(&self, error: &str) -> bool {
        if self.case_sensitive {
            error.contains(self.needle)
        } else {
            error.to_lowercase().contains(self.needle)
        }
    }
}

/// Classification rules in precedence order.
///
/// `"HTTP"` is case-sensitive so status failures (`HTTP 503`) match while
/// lowercase `http://` inside transport errors does not.
pub const CLASSIFY_RULES: &[ClassifyRule] = &[
    ClassifyRule::exact("HTTP", FailureKind::Connection),
    ClassifyRule::folded("timeout", FailureKind::Timeout),
    ClassifyRule::folded("timed out", FailureKind::Timeout),
    ClassifyRule::folded("no video", FailureKind::NoVideo),
    ClassifyRule::folded("connect", FailureKind::Connection),
];

/// Maps a raw probe error to its category.
pub fn classify_error(error: &str) -> FailureKind {
    CLASSIFY_RULES
        .iter()
        .find(|rule| rule.matches(error))
        .map_or(FailureKind::Stream, |rule| rule.kind)
}

/// Formats an error for people: `"Timeout (Timeout after 30s ...)"`.
pub fn friendly_error(error: &str) -> String {
    format!("{} ({})", classify_error(error), error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_is_connection() {
        assert_eq!(classify_error("HTTP 503"), FailureKind::Connection);
        assert_eq!(classify_error("HTTP 404"), FailureKind::Connection);
    }

    #[test]
    fn test_timeout_variants() {
        assert_eq!(
            classify_error("Timeout after 30s waiting for stream data"),
            FailureKind::Timeout
        );
        assert_eq!(classify_error("operation timed out"), FailureKind::Timeout);
        assert_eq!(classify_error("Read TIMEOUT"), FailureKind::Timeout);
    }

    #[test]
    fn test_no_video() {
        assert_eq!(
            classify_error("Link valid but no video received"),
            FailureKind::NoVideo
        );
    }

    #[test]
    fn test_refused_connection() {
        let raw = "error sending request for url (http://127.0.0.1:8089/x): \
                   client error (Connect): tcp connect error: Connection refused";
        assert_eq!(classify_error(raw), FailureKind::Connection);
    }

    #[test]
    fn test_lowercase_http_alone_is_not_connection() {
        assert_eq!(
            classify_error("error decoding response body from http://host/"),
            FailureKind::Stream
        );
    }

    #[test]
    fn test_rule_order_wins() {
        // Status code beats a timeout keyword further down the table.
        assert_eq!(classify_error("HTTP 504 gateway timeout"), FailureKind::Connection);
        // Timeout beats the generic connect rule.
        assert_eq!(classify_error("connect timed out"), FailureKind::Timeout);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(classify_error("No data received"), FailureKind::Stream);
        assert_eq!(classify_error(""), FailureKind::Stream);
    }

    #[test]
    fn test_friendly_error() {
        assert_eq!(friendly_error("HTTP 503"), "Connection Error (HTTP 503)");
        assert_eq!(
            friendly_error("No data received"),
            "Stream Error (No data received)"
        );
    }

    #[test]
    fn test_folded_needles_are_lowercase() {
        for rule in CLASSIFY_RULES.iter().filter(|r| !r.case_sensitive) {
            assert_eq!(rule.needle, rule.needle.to_lowercase());
        }
    }
}
