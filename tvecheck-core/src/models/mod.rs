//! Domain models for tvecheck.
//!
//! ## Submodules
//!
//! - [`channel`] - Channel types (ChannelNumber, Channel)
//! - [`scan`] - Per-pass results (ProbeResult, FailedChannel, ScanOutcome)
//! - [`failure`] - Persisted ledger entries (FailureRecord)

mod channel;
mod failure;
mod scan;
pub mod timestamp;

// Re-export everything at the models level
pub use channel::{Channel, ChannelNumber};
pub use failure::FailureRecord;
pub use scan::{FailedChannel, ProbeResult, ScanOutcome};
