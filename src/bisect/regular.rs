//! Bisection over commit indices.

use super::{SearchOutcome, Strategy};
use crate::trial::Trial;

/// Binary search that treats every commit as one unit.
///
/// The bounds start at `[0, n]`, one past the last index. Keeping that upper
/// bound changes the midpoints the search visits, and the step counts are
/// only comparable with other runs of this experiment if it stays.
#[derive(Debug, Clone)]
pub struct RegularBisector {
    bad_commit: usize,
    min_checked: usize,
    max_checked: usize,
    probe: usize,
    steps: u32,
}

impl RegularBisector {
    /// Start a search over `trial`, probing commit `n / 2` first.
    #[must_use]
    pub fn new(trial: &Trial) -> Self {
        let commit_count = trial.commit_count();
        Self {
            bad_commit: trial.bad_commit(),
            min_checked: 0,
            max_checked: commit_count,
            probe: commit_count / 2,
            steps: 0,
        }
    }

    /// Commit currently under test.
    #[must_use]
    pub const fn probe_commit(&self) -> usize {
        self.probe
    }

    /// Whether the probe has landed on the bad commit.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.probe == self.bad_commit
    }

    /// Transitions taken so far.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Narrow the bounds around the current probe and pick the next one.
    ///
    /// Returns `false` without changing anything once resolved.
    pub fn step(&mut self) -> bool {
        if self.is_resolved() {
            return false;
        }
        if self.probe < self.bad_commit {
            self.min_checked = self.probe;
            self.probe = self.min_checked + (self.max_checked - self.min_checked + 1) / 2;
        } else {
            self.max_checked = self.probe;
            self.probe = self.max_checked - (self.max_checked - self.min_checked + 1) / 2;
        }
        self.steps += 1;
        tracing::trace!(
            probe = self.probe,
            min = self.min_checked,
            max = self.max_checked,
            "regular step"
        );
        true
    }

    /// Step until resolved.
    #[must_use]
    pub fn run(mut self) -> SearchOutcome {
        while self.step() {}
        SearchOutcome {
            strategy: Strategy::Regular,
            steps: self.steps,
            resolved_commit: self.probe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(commit_count: usize, bad_commit: usize) -> Trial {
        Trial::new(vec![1; commit_count], bad_commit).unwrap()
    }

    #[test]
    fn first_probe_is_midpoint() {
        assert_eq!(RegularBisector::new(&trial(3, 0)).probe_commit(), 1);
        assert_eq!(RegularBisector::new(&trial(10, 0)).probe_commit(), 5);
    }

    #[test]
    fn midpoint_hit_takes_no_steps() {
        let outcome = RegularBisector::new(&trial(9, 4)).run();
        assert_eq!(outcome.steps, 0);
        assert_eq!(outcome.resolved_commit, 4);
    }

    #[test]
    fn walks_down_to_first_commit() {
        // n = 4: probes 2, 1, 0.
        let mut search = RegularBisector::new(&trial(4, 0));
        assert_eq!(search.probe_commit(), 2);
        assert!(search.step());
        assert_eq!(search.probe_commit(), 1);
        assert!(search.step());
        assert_eq!(search.probe_commit(), 0);
        assert!(search.is_resolved());
        assert!(!search.step());
        assert_eq!(search.steps(), 2);
    }

    #[test]
    fn upward_steps_round_toward_upper_half() {
        // n = 8: min 0, max 8, probe 4 -> min 4, probe 4 + 5 / 2 = 6.
        let mut search = RegularBisector::new(&trial(8, 7));
        assert!(search.step());
        assert_eq!(search.probe_commit(), 6);
        assert!(search.step());
        assert_eq!(search.probe_commit(), 7);
        assert!(search.is_resolved());
    }

    #[test]
    fn reaches_every_commit() {
        for n in 3..40 {
            for bad in 0..n {
                let outcome = RegularBisector::new(&trial(n, bad)).run();
                assert_eq!(outcome.resolved_commit, bad, "n={n} bad={bad}");
            }
        }
    }
}
