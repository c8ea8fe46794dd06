//! Error types for trial construction and simulation setup.
//!
//! [`SimError`] is the single error type returned by the library. Every
//! search operation itself is infallible: the checks live at the points where
//! a [`Trial`](crate::trial::Trial) or [`SimParams`](crate::sim::SimParams)
//! is built, so a bisector is never handed an input it cannot converge on.

use thiserror::Error;

/// Errors returned while building trials or validating simulation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A commit in the sequence introduces zero lines.
    #[error("commit {commit} owns no lines; every commit must introduce at least one line")]
    EmptyCommit {
        /// Index of the offending commit.
        commit: usize,
    },

    /// The commit sequence is too short to search.
    #[error("trial has {count} commits, at least {min} are required")]
    TooFewCommits {
        /// Number of commits supplied.
        count: usize,
        /// Minimum number of commits a trial needs.
        min: usize,
    },

    /// The fault location is not a valid commit index.
    #[error("bad commit {bad_commit} is outside the sequence of {commit_count} commits")]
    FaultOutOfRange {
        /// The requested fault index.
        bad_commit: usize,
        /// Number of commits in the sequence.
        commit_count: usize,
    },

    /// The commits together hold more lines than a `u64` can count.
    #[error("line counts of {commit_count} commits overflow a 64-bit total")]
    LineOverflow {
        /// Number of commits whose line counts were summed.
        commit_count: usize,
    },

    /// A simulation or configuration parameter is unusable.
    #[error("invalid {field}: {reason}")]
    InvalidConfig {
        /// Name of the parameter.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = SimError::FaultOutOfRange {
            bad_commit: 7,
            commit_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "bad commit 7 is outside the sequence of 3 commits"
        );

        let err = SimError::InvalidConfig {
            field: "max_lines_per_commit",
            reason: "must be at least 1".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid max_lines_per_commit: must be at least 1");
    }
}
