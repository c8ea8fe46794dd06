//! Bisection over the cumulative line axis.

use super::{SearchOutcome, Strategy};
use crate::lines::{commit_from_line, cumulative_lines_through, lines_below_commit};
use crate::trial::Trial;

/// Binary search that splits the remaining *lines* in half rather than the
/// remaining commits.
///
/// The bounds live on the 1-based line axis, starting at `[0, total_lines]`
/// where 0 means "before line 1". Each probe line is mapped back to the
/// commit that owns it, and the comparison against the bad commit happens
/// on that commit. After a probe below the fault the lower bound moves to the
/// first line past the probed commit; after a probe above it the upper bound
/// moves to the last line before the probed commit. The bounds therefore
/// always enclose every line of the bad commit, and the gap between them
/// more than halves each step.
#[derive(Debug, Clone)]
pub struct WeightedBisector<'a> {
    lines_per_commit: &'a [u64],
    bad_commit: usize,
    min_line: u64,
    max_line: u64,
    probe_line: u64,
    probe_commit: usize,
    steps: u32,
}

impl<'a> WeightedBisector<'a> {
    /// Start a search over `trial`, probing line `total_lines / 2` first.
    #[must_use]
    pub fn new(trial: &'a Trial) -> Self {
        let lines_per_commit = trial.lines_per_commit();
        let total = trial.total_lines();
        let probe_line = total / 2;
        Self {
            lines_per_commit,
            bad_commit: trial.bad_commit(),
            min_line: 0,
            max_line: total,
            probe_line,
            probe_commit: commit_from_line(probe_line, lines_per_commit),
            steps: 0,
        }
    }

    /// Line currently under test.
    #[must_use]
    pub const fn probe_line(&self) -> u64 {
        self.probe_line
    }

    /// Commit owning the probe line.
    #[must_use]
    pub const fn probe_commit(&self) -> usize {
        self.probe_commit
    }

    /// Whether the probed commit is the bad commit.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.probe_commit == self.bad_commit
    }

    /// Transitions taken so far.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Narrow the line bounds around the probed commit, choose the next
    /// probe line and resolve it to its commit.
    ///
    /// Returns `false` without changing anything once resolved.
    pub fn step(&mut self) -> bool {
        if self.is_resolved() {
            return false;
        }
        if self.probe_commit < self.bad_commit {
            self.min_line = cumulative_lines_through(self.probe_commit, self.lines_per_commit) + 1;
            self.probe_line = self.min_line + (self.max_line - self.min_line) / 2;
        } else {
            self.max_line = lines_below_commit(self.probe_commit, self.lines_per_commit);
            self.probe_line = self.max_line - (self.max_line - self.min_line) / 2;
        }
        self.steps += 1;
        self.probe_commit = commit_from_line(self.probe_line, self.lines_per_commit);
        tracing::trace!(
            line = self.probe_line,
            commit = self.probe_commit,
            min = self.min_line,
            max = self.max_line,
            "weighted step"
        );
        true
    }

    /// Step until resolved.
    #[must_use]
    pub fn run(mut self) -> SearchOutcome {
        while self.step() {}
        SearchOutcome {
            strategy: Strategy::Weighted,
            steps: self.steps,
            resolved_commit: self.probe_commit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_probe_is_middle_line() {
        let trial = Trial::new(vec![5, 1, 1], 2).unwrap();
        let search = WeightedBisector::new(&trial);
        assert_eq!(search.probe_line(), 3);
        assert_eq!(search.probe_commit(), 0);
        assert!(!search.is_resolved());
    }

    #[test]
    fn climbs_past_a_large_commit() {
        let trial = Trial::new(vec![5, 1, 1], 2).unwrap();
        let mut search = WeightedBisector::new(&trial);

        // Below the fault: skip the rest of commit 0, land on line 6.
        assert!(search.step());
        assert_eq!(search.probe_line(), 6);
        assert_eq!(search.probe_commit(), 1);

        assert!(search.step());
        assert_eq!(search.probe_line(), 7);
        assert_eq!(search.probe_commit(), 2);
        assert!(search.is_resolved());
        assert!(!search.step());
        assert_eq!(search.steps(), 2);
    }

    #[test]
    fn descends_to_first_commit() {
        // total 12, probe line 6 lands in commit 2 (lines 5..=8).
        let trial = Trial::new(vec![2, 2, 4, 4], 0).unwrap();
        let mut search = WeightedBisector::new(&trial);
        assert_eq!(search.probe_commit(), 2);

        // Upper bound drops to line 4, probe 4 - 4 / 2 = 2 in commit 0.
        assert!(search.step());
        assert_eq!(search.probe_line(), 2);
        assert_eq!(search.probe_commit(), 0);
        assert!(search.is_resolved());
    }

    #[test]
    fn large_bad_commit_is_found_immediately() {
        let trial = Trial::new(vec![1, 1, 100, 1, 1], 2).unwrap();
        let outcome = WeightedBisector::new(&trial).run();
        assert_eq!(outcome.steps, 0);
        assert_eq!(outcome.resolved_commit, 2);
    }

    #[test]
    fn reaches_every_commit() {
        let sizes: Vec<u64> = (1..=25).map(|i| (i * 7) % 11 + 1).collect();
        for bad in 0..sizes.len() {
            let trial = Trial::new(sizes.clone(), bad).unwrap();
            let outcome = WeightedBisector::new(&trial).run();
            assert_eq!(outcome.resolved_commit, bad);
        }
    }
}
