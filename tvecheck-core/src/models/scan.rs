//! Scan pass types.
//!
//! - [`ProbeResult`] - What a single probe produced
//! - [`FailedChannel`] - Name and error of a channel that failed this pass
//! - [`ScanOutcome`] - Passed/failed partition of a whole pass

use std::collections::BTreeMap;
use std::time::Duration;

use super::channel::{Channel, ChannelNumber};

// ============================================================================
// Probe Result
// ============================================================================

/// Outcome of probing one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Channel that was probed.
    pub channel_number: ChannelNumber,
    /// Name of the probed channel.
    pub channel_name: String,
    /// Whether stream data arrived.
    pub success: bool,
    /// Failure reason, set iff `success` is false.
    pub error: Option<String>,
}

impl ProbeResult {
    /// A successful probe.
    pub fn passed(channel: &Channel) -> Self {
        Self {
            channel_number: channel.number.clone(),
            channel_name: channel.name.clone(),
            success: true,
            error: None,
        }
    }

    /// A failed probe.
    pub fn failed(channel: &Channel, error: impl Into<String>) -> Self {
        Self {
            channel_number: channel.number.clone(),
            channel_name: channel.name.clone(),
            success: false,
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// Failed Channel
// ============================================================================

/// A channel that failed during the current pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedChannel {
    /// Channel name.
    pub name: String,
    /// Raw failure reason.
    pub error: String,
}

// ============================================================================
// Scan Outcome
// ============================================================================

/// Result of probing every channel once.
///
/// Every probed channel appears in exactly one of the two maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Channels whose stream delivered data, number to name.
    pub passed: BTreeMap<ChannelNumber, String>,
    /// Channels that failed, number to name and error.
    pub failed: BTreeMap<ChannelNumber, FailedChannel>,
    /// Wall-clock time the pass took.
    pub elapsed: Duration,
}

impl ScanOutcome {
    /// Creates an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a probe result under passed or failed.
    ///
    /// A later result for the same channel replaces the earlier one.
    pub fn record(&mut self, result: ProbeResult) {
        let ProbeResult {
            channel_number,
            channel_name,
            success,
            error,
        } = result;

        if success {
            self.failed.remove(&channel_number);
            self.passed.insert(channel_number, channel_name);
        } else {
            self.passed.remove(&channel_number);
            self.failed.insert(
                channel_number,
                FailedChannel {
                    name: channel_name,
                    error: error.unwrap_or_else(|| "Unknown error".to_string()),
                },
            );
        }
    }

    /// Total number of channels in the outcome.
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }

    /// Returns true if at least one channel failed.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
