//! linebisect library crate.
//!
//! The primary interface is the `linebisect` binary. This lib.rs exposes the
//! line accounting, both bisectors and the simulation driver so that
//! integration tests and benchmarks can drive them directly.

pub mod bisect;
pub mod config;
pub mod error;
pub mod format;
pub mod lines;
pub mod sim;
pub mod telemetry;
pub mod trial;

pub use bisect::{SearchOutcome, Strategy};
pub use error::SimError;
pub use sim::{SimParams, Tally, TrialOutcome};
pub use trial::{FaultMode, Trial, TrialGenerator};
