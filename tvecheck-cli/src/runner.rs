//! Scan passes and the watch loop.
//!
//! A pass is: load channels, probe them all, update the ledger, mail a
//! report if anything failed. In watch mode passes repeat on a fixed
//! interval until Ctrl+C.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};
use tvecheck_core::ScanOutcome;
use tvecheck_fetch::{
    ChannelScanner, ChannelSource, DvrChannelSource, HttpClient, HttpStreamProbe,
};
use tvecheck_notify::{Delivery, Notifier, Report};
use tvecheck_store::FailureLedger;

use crate::config::RunConfig;
use crate::output::TextFormatter;

/// Result of one pass.
#[derive(Debug)]
pub struct PassReport {
    /// Probe results.
    pub outcome: ScanOutcome,
    /// What happened to the mail, if one was due.
    pub delivery: Option<Delivery>,
}

/// Owns everything a pass needs.
pub struct Runner {
    source: Box<dyn ChannelSource>,
    scanner: ChannelScanner,
    ledger: FailureLedger,
    notifier: Notifier,
    server_label: String,
    formatter: TextFormatter,
}

impl Runner {
    /// Assembles a runner from its parts.
    pub fn new(
        source: Box<dyn ChannelSource>,
        scanner: ChannelScanner,
        ledger: FailureLedger,
        notifier: Notifier,
        server_label: impl Into<String>,
        formatter: TextFormatter,
    ) -> Self {
        Self {
            source,
            scanner,
            ledger,
            notifier,
            server_label: server_label.into(),
            formatter,
        }
    }

    /// Builds the HTTP-backed runner for `config` and loads the ledger.
    pub async fn from_config(config: &RunConfig, use_colors: bool) -> Result<Self> {
        let client = HttpClient::new().context("Failed to create HTTP client")?;
        let source = DvrChannelSource::new(config.server.clone(), client);

        let probe = HttpStreamProbe::new()
            .context("Failed to create stream client")?
            .with_timeout(config.probe_timeout);
        let scanner = ChannelScanner::new(Arc::new(probe), config.server.clone())
            .with_max_workers(config.max_workers);

        let ledger = FailureLedger::load(&config.ledger_path).await;
        let notifier = Notifier::from_setup(&config.mail);

        Ok(Self::new(
            Box::new(source),
            scanner,
            ledger,
            notifier,
            config.server.authority(),
            TextFormatter::new(use_colors),
        ))
    }

    /// The failure ledger.
    #[cfg(test)]
    pub fn ledger(&self) -> &FailureLedger {
        &self.ledger
    }

    /// Runs one pass.
    ///
    /// # Errors
    ///
    /// The channel list cannot be fetched or is empty. The ledger is not
    /// touched in either case.
    pub async fn run_pass(&mut self) -> Result<PassReport> {
        let outcome = self.scan_pass().await?;
        Ok(self.record_pass(outcome).await)
    }

    /// Loads the channel list and probes every channel. Touches nothing on
    /// disk.
    async fn scan_pass(&self) -> Result<ScanOutcome> {
        println!(
            "{}",
            self.formatter
                .format_pass_header(chrono::Local::now(), &self.server_label)
        );

        let channels = self
            .source
            .channels()
            .await
            .with_context(|| format!("Could not load channels from {}", self.server_label))?;

        let formatter = self.formatter;
        let outcome = self
            .scanner
            .scan_with(&channels, |result| {
                println!("{}", formatter.format_result(result));
            })
            .await
            .with_context(|| format!("No TVE channels found on {}", self.server_label))?;

        println!("{}", self.formatter.format_summary(&outcome));
        Ok(outcome)
    }

    /// Saves the ledger and mails a report if anything failed.
    async fn record_pass(&mut self, outcome: ScanOutcome) -> PassReport {
        self.ledger.update(&outcome).await;
        info!(failing = self.ledger.len(), "Failure ledger updated");

        let delivery = if outcome.has_failures() {
            let report = Report::build(
                &outcome.passed,
                &outcome.failed,
                |number| self.ledger.failure_duration(number),
                self.server_label.as_str(),
            );
            Some(self.notifier.notify(&report).await)
        } else {
            info!("All channels passed, no report sent");
            None
        };

        PassReport { outcome, delivery }
    }

    /// Runs a pass every `frequency` until Ctrl+C.
    ///
    /// Ctrl+C during the scan drops that pass. Ctrl+C while the ledger is
    /// saved or the report is sent stops the loop after the pass finishes.
    ///
    /// # Errors
    ///
    /// Any pass error ends the loop.
    pub async fn watch(&mut self, frequency: Duration) -> Result<()> {
        info!(
            minutes = frequency.as_secs() / 60,
            "Starting watch mode, press Ctrl+C to exit"
        );

        let mut ticker = interval(frequency);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // One listener for the whole loop, so a Ctrl+C during `record_pass`
        // is seen at the next select.
        let mut ctrl_c = std::pin::pin!(signal::ctrl_c());

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut ctrl_c => break,
            }

            // Only the scan is interruptible; once results exist the ledger
            // save and report always run to completion.
            let outcome = tokio::select! {
                result = self.scan_pass() => result?,
                _ = &mut ctrl_c => {
                    warn!("Interrupted during scan, ledger not updated for this pass");
                    break;
                }
            };
            self.record_pass(outcome).await;
        }

        info!("Stopping");
        Ok(())
    }
}
