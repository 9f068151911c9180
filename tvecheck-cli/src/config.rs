//! Run configuration.
//!
//! Command-line options are checked once here and turned into a
//! [`RunConfig`] that the runner takes as-is.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tvecheck_fetch::{DvrServer, FetchError};
use tvecheck_notify::MailSetup;
use tvecheck_store::default_ledger_path;

use crate::Cli;

/// Lowest allowed scan frequency, in minutes.
pub const MIN_FREQUENCY_MINUTES: u64 = 60;

/// Default scan frequency, in minutes.
pub const DEFAULT_FREQUENCY_MINUTES: u64 = 60;

/// Default probe timeout, in seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Invalid command-line configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Frequency below [`MIN_FREQUENCY_MINUTES`].
    #[error("Frequency must be at least {min} minutes, got {given}")]
    FrequencyTooLow {
        /// Requested frequency.
        given: u64,
        /// Allowed minimum.
        min: u64,
    },

    /// Frequency too large to express in seconds.
    #[error("Frequency of {0} minutes is out of range")]
    FrequencyOutOfRange(u64),

    /// Probe timeout of zero.
    #[error("Probe timeout must be at least 1 second")]
    ZeroTimeout,

    /// Address and port do not form a valid server URL.
    #[error("Invalid DVR server address: {0}")]
    Server(#[from] FetchError),
}

/// Validated settings for a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// DVR server.
    pub server: DvrServer,
    /// Time between passes in watch mode.
    pub frequency: Duration,
    /// Concurrent probes.
    pub max_workers: usize,
    /// Probe limit on connect + first chunk.
    pub probe_timeout: Duration,
    /// Failure ledger file.
    pub ledger_path: PathBuf,
    /// Mail options.
    pub mail: MailSetup,
    /// Single pass only.
    pub once: bool,
}

impl RunConfig {
    /// Validates command-line options.
    ///
    /// Incomplete mail settings are not an error here; they disable mail
    /// when the notifier is built.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.frequency < MIN_FREQUENCY_MINUTES {
            return Err(ConfigError::FrequencyTooLow {
                given: cli.frequency,
                min: MIN_FREQUENCY_MINUTES,
            });
        }
        let frequency_secs = cli
            .frequency
            .checked_mul(60)
            .ok_or(ConfigError::FrequencyOutOfRange(cli.frequency))?;
        if cli.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let server = DvrServer::new(&cli.ip_address, cli.port_number)?;

        let mail = MailSetup::from_parts(
            cli.smtp_server.clone(),
            cli.smtp_port,
            cli.sender_email.clone(),
            cli.sender_password.clone(),
            cli.recipient_email.clone(),
        );

        Ok(Self {
            server,
            frequency: Duration::from_secs(frequency_secs),
            max_workers: cli.max_workers.max(1),
            probe_timeout: Duration::from_secs(cli.timeout),
            ledger_path: cli.log_file.clone().unwrap_or_else(default_ledger_path),
            mail,
            once: cli.once,
        })
    }
}
