// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! tvecheck - health checks for Channels DVR TV-Everywhere channels.
//!
//! # Examples
//!
//! ```bash
//! # Check the local DVR once
//! tvecheck --once
//!
//! # Check a remote DVR every two hours with 20 parallel probes
//! tvecheck -i 192.168.1.50 -f 120 --max-workers 20
//!
//! # Mail a report when channels fail
//! tvecheck --smtp-server smtp.gmail.com --sender-email dvr@example.com \
//!     --sender-password "app password" --recipient-email me@example.com
//! ```

mod config;
mod output;
mod runner;

use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tvecheck_fetch::DEFAULT_MAX_WORKERS;
use tvecheck_fetch::source::{DEFAULT_HOST, DEFAULT_PORT};
use tvecheck_notify::DEFAULT_SMTP_PORT;

use config::{DEFAULT_FREQUENCY_MINUTES, DEFAULT_PROBE_TIMEOUT_SECS, RunConfig};
use runner::Runner;

// ============================================================================
// CLI Definition
// ============================================================================

/// tvecheck - Channels DVR TVE channel health checks.
#[derive(Parser)]
#[command(name = "tvecheck")]
#[command(about = "Health checks for Channels DVR TV-Everywhere channels")]
#[command(long_about = r#"
tvecheck opens the stream of every visible TV-Everywhere channel on a
Channels DVR server, records which ones fail and for how long, and can
mail a report whenever something is broken.

Mail is all-or-nothing: give --smtp-server, --sender-email,
--sender-password and --recipient-email together, or none of them.

Every option can also be set through a TVECHECK_* environment variable.
"#)]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// Minutes between scans (minimum 60).
    #[arg(
        long,
        short = 'f',
        default_value_t = DEFAULT_FREQUENCY_MINUTES,
        env = "TVECHECK_FREQUENCY"
    )]
    pub frequency: u64,

    /// Channels DVR server address.
    #[arg(
        long = "ip-address",
        short = 'i',
        default_value = DEFAULT_HOST,
        env = "TVECHECK_IP_ADDRESS"
    )]
    pub ip_address: String,

    /// Channels DVR server port.
    #[arg(
        long = "port-number",
        short = 'p',
        default_value_t = DEFAULT_PORT,
        env = "TVECHECK_PORT_NUMBER"
    )]
    pub port_number: u16,

    /// Maximum number of streams probed at once.
    #[arg(long, default_value_t = DEFAULT_MAX_WORKERS, env = "TVECHECK_MAX_WORKERS")]
    pub max_workers: usize,

    /// Failure ledger file (defaults to the platform data directory).
    #[arg(long, env = "TVECHECK_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Seconds to wait for a stream's first data.
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_SECS, env = "TVECHECK_TIMEOUT")]
    pub timeout: u64,

    /// SMTP server host.
    #[arg(long, env = "TVECHECK_SMTP_SERVER")]
    pub smtp_server: Option<String>,

    /// SMTP server port.
    #[arg(long, default_value_t = DEFAULT_SMTP_PORT, env = "TVECHECK_SMTP_PORT")]
    pub smtp_port: u16,

    /// Sender address, also used as SMTP login.
    #[arg(long, env = "TVECHECK_SENDER_EMAIL")]
    pub sender_email: Option<String>,

    /// SMTP password.
    #[arg(long, env = "TVECHECK_SENDER_PASSWORD", hide_env_values = true)]
    pub sender_password: Option<String>,

    /// Report recipient.
    #[arg(long, env = "TVECHECK_RECIPIENT_EMAIL")]
    pub recipient_email: Option<String>,

    /// Run a single scan and exit.
    #[arg(long, env = "TVECHECK_ONCE")]
    pub once: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output (show debug info).
    #[arg(long)]
    pub verbose: bool,

    /// Quiet mode (no logging).
    #[arg(long, short)]
    pub quiet: bool,

    /// Print version.
    #[arg(long, short = 'v', action = ArgAction::Version)]
    pub version: Option<bool>,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Configuration or runtime error.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("tvecheck=debug,info")
        } else {
            EnvFilter::new("tvecheck=info,warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(ExitCode::Error as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}

async fn run(cli: &Cli) -> Result<()> {
    let config = RunConfig::from_cli(cli)?;
    info!(
        server = %config.server.authority(),
        ledger = %config.ledger_path.display(),
        "Starting tvecheck v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut runner = Runner::from_config(&config, !cli.no_color).await?;

    if config.once {
        runner.run_pass().await?;
        Ok(())
    } else {
        runner.watch(config.frequency).await
    }
}
