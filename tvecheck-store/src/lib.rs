// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # tvecheck Store
//!
//! Persistent state for tvecheck.
//!
//! This crate provides:
//!
//! - **FailureLedger**: which channels are failing, since when, and why
//! - **Persistence**: JSON file helpers and default paths
//!
//! ## Usage
//!
//! ```ignore
//! use tvecheck_store::{FailureLedger, default_ledger_path};
//!
//! let mut ledger = FailureLedger::load(default_ledger_path()).await;
//! ledger.update(&outcome).await;
//!
//! for number in outcome.failed.keys() {
//!     println!("#{number} failing for {:?}", ledger.failure_duration(number));
//! }
//! ```

pub mod error;
pub mod ledger;
pub mod persistence;

pub use error::StoreError;
pub use ledger::FailureLedger;
pub use persistence::{LEDGER_FILE_NAME, default_ledger_path, default_state_dir, load_json, save_json};
