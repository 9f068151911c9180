//! Failure ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A channel that is currently failing, as persisted in the ledger.
///
/// `first_failed` is set once, when the failure streak starts.
/// `last_checked` and `error` follow the most recent failed probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Channel name at the time of the last failure.
    pub name: String,
    /// Start of the current failure streak.
    #[serde(with = "timestamp")]
    pub first_failed: DateTime<Utc>,
    /// Time of the most recent failed probe.
    #[serde(with = "timestamp")]
    pub last_checked: DateTime<Utc>,
    /// Raw error from the most recent failed probe.
    pub error: String,
}

impl FailureRecord {
    /// Starts a new failure streak at `now`.
    pub fn new(name: impl Into<String>, error: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            first_failed: now,
            last_checked: now,
            error: error.into(),
        }
    }

    /// Records another failure in the same streak.
    pub fn touch(&mut self, error: impl Into<String>, now: DateTime<Utc>) {
        self.last_checked = now;
        self.error = error.into();
    }

    /// How long the channel has been failing as of `now`.
    pub fn failing_for(&self, now: DateTime<Utc>) -> chrono::TimeDelta {
        now - self.first_failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_touch_keeps_first_failed() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let later = start + Duration::hours(1);

        let mut record = FailureRecord::new("ESPN", "HTTP 503", start);
        record.touch("No data received", later);

        assert_eq!(record.first_failed, start);
        assert_eq!(record.last_checked, later);
        assert_eq!(record.error, "No data received");
        assert_eq!(record.failing_for(later), Duration::hours(1));
    }
}
