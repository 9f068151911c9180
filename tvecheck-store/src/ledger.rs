//! Failure ledger.
//!
//! Tracks which channels are currently failing and since when. A record
//! exists for a channel exactly when its most recent probe failed:
//!
//! - first failure: record created, `first_failed = last_checked = now`
//! - repeated failure: only `last_checked` and `error` change
//! - success: record removed
//!
//! The whole map is written back to disk after every update.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tvecheck_core::{
    ChannelNumber, FailedChannel, FailureRecord, ScanOutcome, format_failure_duration,
};

use crate::error::StoreError;
use crate::persistence::{load_json, save_json};

/// Persisted map of failing channels.
#[derive(Debug, Clone)]
pub struct FailureLedger {
    path: PathBuf,
    records: BTreeMap<ChannelNumber, FailureRecord>,
}

impl FailureLedger {
    /// Creates an empty ledger that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
        }
    }

    /// Loads the ledger at `path`.
    ///
    /// Never fails: a missing file yields an empty ledger, and an unreadable
    /// or corrupt one yields an empty ledger plus a warning.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        match load_json::<BTreeMap<ChannelNumber, FailureRecord>>(&path).await {
            Ok(records) => {
                info!(
                    path = %path.display(),
                    failing = records.len(),
                    "Loaded failure ledger"
                );
                Self { path, records }
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "No failure ledger yet, starting empty");
                Self::empty(path)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not read failure ledger, starting empty"
                );
                Self::empty(path)
            }
        }
    }

    /// File this ledger is saved to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, keyed by channel number.
    pub fn records(&self) -> &BTreeMap<ChannelNumber, FailureRecord> {
        &self.records
    }

    /// Record for one channel, if it is failing.
    pub fn get(&self, number: &ChannelNumber) -> Option<&FailureRecord> {
        self.records.get(number)
    }

    /// Number of failing channels.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no channel is failing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Applies one pass's results in memory.
    pub fn apply(
        &mut self,
        failed: &BTreeMap<ChannelNumber, FailedChannel>,
        passed: &BTreeMap<ChannelNumber, String>,
        now: DateTime<Utc>,
    ) {
        for (number, channel) in failed {
            match self.records.get_mut(number) {
                Some(record) => record.touch(channel.error.clone(), now),
                None => {
                    debug!(channel = %number, "New failure");
                    self.records.insert(
                        number.clone(),
                        FailureRecord::new(channel.name.clone(), channel.error.clone(), now),
                    );
                }
            }
        }

        for number in passed.keys() {
            if self.records.remove(number).is_some() {
                info!(channel = %number, "Channel recovered");
            }
        }
    }

    /// Applies a scan outcome as of now and saves.
    pub async fn update(&mut self, outcome: &ScanOutcome) {
        self.update_at(&outcome.failed, &outcome.passed, Utc::now())
            .await;
    }

    /// Applies one pass's results as of `now` and saves.
    ///
    /// A failed save is logged and otherwise ignored; the in-memory state
    /// is still updated and will be written on the next successful save.
    pub async fn update_at(
        &mut self,
        failed: &BTreeMap<ChannelNumber, FailedChannel>,
        passed: &BTreeMap<ChannelNumber, String>,
        now: DateTime<Utc>,
    ) {
        self.apply(failed, passed, now);

        if let Err(e) = self.save().await {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Could not save failure ledger"
            );
        }
    }

    /// Writes the whole ledger to disk.
    ///
    /// # Errors
    ///
    /// Serialization or filesystem errors.
    pub async fn save(&self) -> Result<(), StoreError> {
        save_json(&self.path, &self.records).await
    }

    /// How long a channel has been failing, e.g. `"3 hours"`.
    ///
    /// `None` if the channel has no record.
    pub fn failure_duration(&self, number: &ChannelNumber) -> Option<String> {
        self.failure_duration_at(number, Utc::now())
    }

    /// [`Self::failure_duration`] against an explicit clock.
    pub fn failure_duration_at(
        &self,
        number: &ChannelNumber,
        now: DateTime<Utc>,
    ) -> Option<String> {
        self.records
            .get(number)
            .map(|record| format_failure_duration(record.failing_for(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn num(n: u32) -> ChannelNumber {
        ChannelNumber::from(n)
    }

    fn failed(entries: &[(u32, &str, &str)]) -> BTreeMap<ChannelNumber, FailedChannel> {
        entries
            .iter()
            .map(|(n, name, error)| {
                (
                    num(*n),
                    FailedChannel {
                        name: (*name).to_string(),
                        error: (*error).to_string(),
                    },
                )
            })
            .collect()
    }

    fn passed(entries: &[(u32, &str)]) -> BTreeMap<ChannelNumber, String> {
        entries
            .iter()
            .map(|(n, name)| (num(*n), (*name).to_string()))
            .collect()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 30, 16, 0, 0).unwrap()
    }

    #[test]
    fn test_first_failure_creates_record() {
        let mut ledger = FailureLedger::empty("unused.json");
        ledger.apply(&failed(&[(2, "B", "HTTP 503")]), &passed(&[(1, "A")]), t0());

        assert_eq!(ledger.len(), 1);
        let record = ledger.get(&num(2)).unwrap();
        assert_eq!(record.name, "B");
        assert_eq!(record.error, "HTTP 503");
        assert_eq!(record.first_failed, t0());
        assert_eq!(record.last_checked, t0());
        assert!(ledger.get(&num(1)).is_none());
    }

    #[test]
    fn test_repeated_failure_keeps_first_failed() {
        let mut ledger = FailureLedger::empty("unused.json");
        let t1 = t0() + Duration::hours(1);

        ledger.apply(&failed(&[(2, "B", "HTTP 503")]), &passed(&[]), t0());
        ledger.apply(&failed(&[(2, "B", "No data received")]), &passed(&[]), t1);

        let record = ledger.get(&num(2)).unwrap();
        assert_eq!(record.first_failed, t0());
        assert_eq!(record.last_checked, t1);
        assert_eq!(record.error, "No data received");
    }

    #[test]
    fn test_recovery_removes_record() {
        let mut ledger = FailureLedger::empty("unused.json");

        ledger.apply(&failed(&[(2, "B", "HTTP 503")]), &passed(&[(1, "A")]), t0());
        ledger.apply(
            &failed(&[]),
            &passed(&[(1, "A"), (2, "B")]),
            t0() + Duration::hours(1),
        );

        assert!(ledger.is_empty());
    }

    #[test]
    fn test_failure_duration() {
        let mut ledger = FailureLedger::empty("unused.json");
        ledger.apply(&failed(&[(2, "B", "HTTP 503")]), &passed(&[]), t0());

        let at = |d: Duration| ledger.failure_duration_at(&num(2), t0() + d);
        assert_eq!(at(Duration::seconds(30)).as_deref(), Some("just now"));
        assert_eq!(at(Duration::minutes(1)).as_deref(), Some("1 minute"));
        assert_eq!(at(Duration::minutes(5)).as_deref(), Some("5 minutes"));
        assert_eq!(at(Duration::hours(1)).as_deref(), Some("1 hour"));
        assert_eq!(at(Duration::hours(3)).as_deref(), Some("3 hours"));
        assert_eq!(at(Duration::days(1)).as_deref(), Some("1 day"));
        assert_eq!(at(Duration::days(2)).as_deref(), Some("2 days"));
        assert_eq!(ledger.failure_duration_at(&num(1), t0()), None);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let ledger = FailureLedger::load(temp_dir.path().join("missing.json")).await;
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");
        tokio::fs::write(&path, "[1, 2,").await.unwrap();

        let ledger = FailureLedger::load(&path).await;
        assert!(ledger.is_empty());
        assert_eq!(ledger.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_load_wrong_shape_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");
        tokio::fs::write(&path, r#"{"2": {"name": "B"}}"#).await.unwrap();

        assert!(FailureLedger::load(&path).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");

        let mut ledger = FailureLedger::empty(&path);
        let now = Utc::now();
        ledger
            .update_at(
                &failed(&[(2, "B", "HTTP 503"), (10, "J", "No data received")]),
                &passed(&[(1, "A")]),
                now,
            )
            .await;
        ledger
            .update_at(
                &failed(&[(2, "B", "HTTP 404")]),
                &passed(&[]),
                now + Duration::milliseconds(1500),
            )
            .await;

        let reloaded = FailureLedger::load(&path).await;
        assert_eq!(reloaded.records(), ledger.records());
    }

    #[tokio::test]
    async fn test_file_schema() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");

        let mut ledger = FailureLedger::empty(&path);
        ledger
            .update_at(&failed(&[(2, "B", "HTTP 503")]), &passed(&[(1, "A")]), t0())
            .await;

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "2": {
                    "name": "B",
                    "first_failed": "2025-11-30T16:00:00Z",
                    "last_checked": "2025-11-30T16:00:00Z",
                    "error": "HTTP 503"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_unwritable_path_keeps_memory_state() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = temp_dir.path().join("ledger.json");
        tokio::fs::create_dir(&path).await.unwrap();

        let mut ledger = FailureLedger::empty(&path);
        ledger
            .update_at(&failed(&[(2, "B", "HTTP 503")]), &passed(&[]), t0())
            .await;

        assert_eq!(ledger.len(), 1);
        assert!(ledger.save().await.is_err());
    }
}
