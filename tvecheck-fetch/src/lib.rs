// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # tvecheck Fetch
//!
//! Network side of tvecheck: talking to the Channels DVR and probing
//! channel streams.
//!
//! - [`client::HttpClient`] - reqwest wrapper with tracing
//! - [`source::DvrChannelSource`] - visible TVE channels from `/api/v1/channels`
//! - [`probe::HttpStreamProbe`] - "does this stream deliver a first chunk?"
//! - [`scanner::ChannelScanner`] - probes all channels with bounded concurrency
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tvecheck_fetch::{ChannelScanner, DvrServer, HttpStreamProbe};
//!
//! let server = DvrServer::new("127.0.0.1", 8089)?;
//! let probe = Arc::new(HttpStreamProbe::new()?);
//! let scanner = ChannelScanner::new(probe, server).with_max_workers(10);
//!
//! let outcome = scanner.scan(&channels).await?;
//! println!("{} passed, {} failed", outcome.passed.len(), outcome.failed.len());
//! ```

pub mod client;
pub mod error;
pub mod probe;
pub mod scanner;
pub mod source;

// Errors
pub use error::{FetchError, ProbeFailure, ScanError};

// HTTP
pub use client::HttpClient;

// Channel source
pub use source::{
    ApiChannel, ChannelSource, DvrChannelSource, DvrServer, filter_tve_channels, parse_listing,
};

// Probing & scanning
pub use probe::{DEFAULT_PROBE_TIMEOUT, HttpStreamProbe, StreamProbe};
pub use scanner::{ChannelScanner, DEFAULT_MAX_WORKERS};
