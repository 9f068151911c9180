// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `tvecheck` Core
//!
//! Core types, models, and rules shared by every `tvecheck` crate.
//!
//! This crate provides the foundational abstractions used across all other
//! `tvecheck` crates, including:
//!
//! - Domain models (channels, probe results, failure records)
//! - Error types
//! - Failure classification rules for human-readable reports
//! - Failure duration formatting
//!
//! ## Key Types
//!
//! ### Channel Types
//! - [`ChannelNumber`] - Channel identifier as reported by the DVR
//! - [`Channel`] - A channel to be probed
//!
//! ### Scan Types
//! - [`ProbeResult`] - Outcome of a single probe
//! - [`FailedChannel`] - A failed channel inside a scan outcome
//! - [`ScanOutcome`] - Passed/failed partition of a full scan pass
//!
//! ### Ledger Types
//! - [`FailureRecord`] - One persisted entry of the failure ledger
//!
//! ### Reporting
//! - [`FailureKind`] - Coarse failure category
//! - [`classify_error`] - Maps a raw error string to a [`FailureKind`]
//! - [`format_failure_duration`] - "2 days", "1 hour", "just now"

pub mod classify;
pub mod duration;
pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Channel types
    Channel,
    ChannelNumber,
    // Scan types
    FailedChannel,
    ProbeResult,
    ScanOutcome,
    // Ledger types
    FailureRecord,
};

pub use classify::{classify_error, friendly_error, ClassifyRule, FailureKind, CLASSIFY_RULES};
pub use duration::format_failure_duration;
