//! Concurrent channel scanner.
//!
//! Probes every channel once with at most `max_workers` probes in flight.
//! Each probe runs on its own tokio task; results are merged by the single
//! consumer of the stream in completion order.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use tvecheck_core::{Channel, ProbeResult, ScanOutcome};

use crate::error::ScanError;
use crate::probe::StreamProbe;
use crate::source::DvrServer;

/// Default number of concurrent probes.
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Fans stream probes out over a bounded worker pool.
#[derive(Clone)]
pub struct ChannelScanner {
    probe: Arc<dyn StreamProbe>,
    server: DvrServer,
    max_workers: usize,
}

impl ChannelScanner {
    /// Creates a scanner with [`DEFAULT_MAX_WORKERS`].
    pub fn new(probe: Arc<dyn StreamProbe>, server: DvrServer) -> Self {
        Self {
            probe,
            server,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    /// Sets the concurrency bound. Zero is treated as one.
    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Returns the concurrency bound.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Probes every channel once.
    ///
    /// # Errors
    ///
    /// [`ScanError::NoChannels`] if `channels` is empty.
    pub async fn scan(&self, channels: &[Channel]) -> Result<ScanOutcome, ScanError> {
        self.scan_with(channels, |_| {}).await
    }

    /// Probes every channel once, calling `on_result` as each probe finishes.
    ///
    /// # Errors
    ///
    /// [`ScanError::NoChannels`] if `channels` is empty.
    pub async fn scan_with<F>(
        &self,
        channels: &[Channel],
        mut on_result: F,
    ) -> Result<ScanOutcome, ScanError>
    where
        F: FnMut(&ProbeResult),
    {
        if channels.is_empty() {
            return Err(ScanError::NoChannels);
        }

        info!(
            channels = channels.len(),
            workers = self.max_workers,
            "Starting scan"
        );
        let start = Instant::now();

        let mut results = stream::iter(channels.iter().cloned())
            .map(|channel| self.probe_channel(channel))
            .buffer_unordered(self.max_workers);

        let mut outcome = ScanOutcome::new();
        while let Some(result) = results.next().await {
            on_result(&result);
            outcome.record(result);
        }
        outcome.elapsed = start.elapsed();

        info!(
            passed = outcome.passed.len(),
            failed = outcome.failed.len(),
            elapsed_ms = u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            "Scan complete"
        );
        Ok(outcome)
    }

    async fn probe_channel(&self, channel: Channel) -> ProbeResult {
        let probe = Arc::clone(&self.probe);
        let url = self.server.stream_url(&channel.number);

        match tokio::spawn(async move { probe.probe(&url).await }).await {
            Ok(Ok(())) => ProbeResult::passed(&channel),
            Ok(Err(failure)) => ProbeResult::failed(&channel, failure.to_string()),
            Err(e) => {
                warn!(channel = %channel.number, error = %e, "Probe task aborted");
                ProbeResult::failed(&channel, format!("Probe task failed: {e}"))
            }
        }
    }
}
