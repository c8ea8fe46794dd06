//! The two bisection strategies under comparison.
//!
//! Both are explicit state machines over a shared [`Trial`]: build one with
//! `new`, advance it with `step`, or drive it to the bad commit with `run`.
//! A step is one probe-and-narrow transition. The final probe that lands on
//! the bad commit is not counted, and neither is the line-to-commit lookup
//! the weighted strategy does at every probe.

pub mod regular;
pub mod weighted;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::trial::Trial;

pub use regular::RegularBisector;
pub use weighted::WeightedBisector;

/// Which bisection strategy produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Bisect over commit indices, every commit weighted equally.
    Regular,
    /// Bisect over the cumulative line axis.
    Weighted,
}

impl Strategy {
    /// Both strategies, in reporting order.
    pub const ALL: [Self; 2] = [Self::Regular, Self::Weighted];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Weighted => write!(f, "weighted"),
        }
    }
}

/// Result of running one bisector to termination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// Strategy that ran.
    pub strategy: Strategy,
    /// Transitions taken before the probe landed on the bad commit.
    pub steps: u32,
    /// Commit the search converged on. Always the trial's bad commit.
    pub resolved_commit: usize,
}

/// Run `strategy` against `trial` until it finds the bad commit.
#[must_use]
pub fn bisect(strategy: Strategy, trial: &Trial) -> SearchOutcome {
    match strategy {
        Strategy::Regular => RegularBisector::new(trial).run(),
        Strategy::Weighted => WeightedBisector::new(trial).run(),
    }
}
