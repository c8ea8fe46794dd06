//! Trial scenarios and the random trial generator.
//!
//! A [`Trial`] is one commit history plus the index of the commit that
//! introduced the fault. Both bisectors run against the same trial.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SimError;
use crate::lines;

/// Fewest commits a trial may have. Smaller histories leave nothing to bisect.
pub const MIN_COMMITS: usize = 3;

// ---------------------------------------------------------------------------
// Trial
// ---------------------------------------------------------------------------

/// A validated commit history with a designated bad commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trial {
    lines_per_commit: Vec<u64>,
    bad_commit: usize,
    total_lines: u64,
}

impl Trial {
    /// Build a trial.
    ///
    /// # Errors
    /// Returns [`SimError`] if there are fewer than [`MIN_COMMITS`] commits,
    /// a commit owns no lines, the line counts overflow a `u64` total, or
    /// `bad_commit` is not a valid index.
    pub fn new(lines_per_commit: Vec<u64>, bad_commit: usize) -> Result<Self, SimError> {
        if lines_per_commit.len() < MIN_COMMITS {
            return Err(SimError::TooFewCommits {
                count: lines_per_commit.len(),
                min: MIN_COMMITS,
            });
        }
        if let Some(commit) = lines_per_commit.iter().position(|&n| n == 0) {
            return Err(SimError::EmptyCommit { commit });
        }
        if bad_commit >= lines_per_commit.len() {
            return Err(SimError::FaultOutOfRange {
                bad_commit,
                commit_count: lines_per_commit.len(),
            });
        }
        let total_lines = checked_total(&lines_per_commit)?;
        Ok(Self {
            lines_per_commit,
            bad_commit,
            total_lines,
        })
    }

    /// Build a trial whose fault is the commit owning `bad_line` (1-based).
    ///
    /// # Errors
    /// Same as [`Trial::new`], plus [`SimError::InvalidConfig`] when
    /// `bad_line` is outside `1..=total_lines`.
    pub fn from_bad_line(lines_per_commit: Vec<u64>, bad_line: u64) -> Result<Self, SimError> {
        let total = checked_total(&lines_per_commit)?;
        if bad_line == 0 || bad_line > total {
            return Err(SimError::InvalidConfig {
                field: "bad_line",
                reason: format!("{bad_line} is outside 1..={total}"),
            });
        }
        let bad_commit = lines::commit_from_line(bad_line, &lines_per_commit);
        Self::new(lines_per_commit, bad_commit)
    }

    /// Per-commit line counts.
    #[must_use]
    pub fn lines_per_commit(&self) -> &[u64] {
        &self.lines_per_commit
    }

    /// Number of commits in the history.
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.lines_per_commit.len()
    }

    /// Index of the commit that introduced the fault.
    #[must_use]
    pub const fn bad_commit(&self) -> usize {
        self.bad_commit
    }

    /// Sum of all per-commit line counts.
    #[must_use]
    pub const fn total_lines(&self) -> u64 {
        self.total_lines
    }
}

fn checked_total(lines_per_commit: &[u64]) -> Result<u64, SimError> {
    lines::checked_total_lines(lines_per_commit).ok_or(SimError::LineOverflow {
        commit_count: lines_per_commit.len(),
    })
}

// ---------------------------------------------------------------------------
// FaultMode
// ---------------------------------------------------------------------------

/// How the generator places the fault.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultMode {
    /// Draw a line uniformly and blame its owner, so larger commits are
    /// proportionally more likely to be bad.
    #[default]
    Line,
    /// Draw the bad commit uniformly, ignoring commit sizes.
    Commit,
}

impl fmt::Display for FaultMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "line"),
            Self::Commit => write!(f, "commit"),
        }
    }
}

impl FromStr for FaultMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "commit" => Ok(Self::Commit),
            _ => Err(SimError::InvalidConfig {
                field: "fault_mode",
                reason: format!("'{s}' is not one of: line, commit"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// TrialGenerator
// ---------------------------------------------------------------------------

/// Draws random trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialGenerator {
    max_lines_per_commit: u64,
    fault_mode: FaultMode,
}

impl TrialGenerator {
    /// Create a generator drawing per-commit line counts from
    /// `1..=max_lines_per_commit`.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidConfig`] if `max_lines_per_commit` is 0.
    pub fn new(max_lines_per_commit: u64, fault_mode: FaultMode) -> Result<Self, SimError> {
        if max_lines_per_commit == 0 {
            return Err(SimError::InvalidConfig {
                field: "max_lines_per_commit",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            max_lines_per_commit,
            fault_mode,
        })
    }

    /// Draw one trial whose commit count lies in `MIN_COMMITS..=max_commits`.
    ///
    /// # Errors
    /// Returns [`SimError::TooFewCommits`] if `max_commits < MIN_COMMITS`.
    pub fn generate<R: Rng>(&self, rng: &mut R, max_commits: usize) -> Result<Trial, SimError> {
        if max_commits < MIN_COMMITS {
            return Err(SimError::TooFewCommits {
                count: max_commits,
                min: MIN_COMMITS,
            });
        }
        let commit_count = rng.random_range(MIN_COMMITS..=max_commits);
        let lines_per_commit: Vec<u64> = (0..commit_count)
            .map(|_| rng.random_range(1..=self.max_lines_per_commit))
            .collect();

        match self.fault_mode {
            FaultMode::Line => {
                let total = checked_total(&lines_per_commit)?;
                let bad_line = rng.random_range(1..=total);
                Trial::from_bad_line(lines_per_commit, bad_line)
            }
            FaultMode::Commit => {
                let bad_commit = rng.random_range(0..commit_count);
                Trial::new(lines_per_commit, bad_commit)
            }
        }
    }
}
