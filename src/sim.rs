//! Simulation driver: random trials, both bisectors, win tallies.
//!
//! For every commit bound `c` in `MIN_COMMITS..max_commits` the driver runs
//! `runs` trials. Each trial is searched by both strategies, and whichever
//! needed strictly fewer steps gets the win. Ties go to neither.
//!
//! All randomness comes from the caller's generator, so a seeded
//! [`rand::rngs::StdRng`] reproduces a whole simulation.

use rand::Rng;
use serde::Serialize;

use crate::bisect::{Strategy, bisect};
use crate::error::SimError;
use crate::trial::{FaultMode, MIN_COMMITS, Trial, TrialGenerator};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Inputs to one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SimParams {
    /// Exclusive upper end of the commit-bound sweep.
    pub max_commits: usize,
    /// Largest line count a single commit may draw.
    pub max_lines_per_commit: u64,
    /// Trials per commit bound.
    pub runs: u64,
    /// How faults are placed.
    pub fault_mode: FaultMode,
}

impl SimParams {
    /// Check the parameters before any trial is drawn.
    ///
    /// A commit bound too small to produce trials is not an error: the sweep
    /// is simply empty.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidConfig`] if `max_lines_per_commit` is 0, or
    /// if the largest history the sweep can draw could hold more lines than
    /// a `u64` counts.
    pub fn validate(&self) -> Result<(), SimError> {
        TrialGenerator::new(self.max_lines_per_commit, self.fault_mode)?;
        let Some(largest_bound) = self.commit_bounds().last() else {
            return Ok(());
        };
        let worst_case = u64::try_from(largest_bound)
            .ok()
            .and_then(|commits| commits.checked_mul(self.max_lines_per_commit));
        if worst_case.is_none() {
            return Err(SimError::InvalidConfig {
                field: "max_lines_per_commit",
                reason: format!(
                    "{} lines in each of {largest_bound} commits overflows a u64 total",
                    self.max_lines_per_commit
                ),
            });
        }
        Ok(())
    }

    /// Commit bounds the sweep visits.
    #[must_use]
    pub fn commit_bounds(&self) -> std::ops::Range<usize> {
        MIN_COMMITS..self.max_commits.max(MIN_COMMITS)
    }

    /// Number of trials the sweep will run.
    #[must_use]
    pub fn planned_trials(&self) -> u64 {
        let bounds = self.commit_bounds().len() as u64;
        bounds.saturating_mul(self.runs)
    }
}

// ---------------------------------------------------------------------------
// Per-trial outcome
// ---------------------------------------------------------------------------

/// What happened on one trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TrialOutcome {
    /// Commit bound of the outer sweep this trial was drawn under.
    pub commit_bound: usize,
    /// Commits in the drawn history.
    pub commit_count: usize,
    /// Lines in the drawn history.
    pub total_lines: u64,
    /// Index of the bad commit.
    pub bad_commit: usize,
    /// Steps taken by the commit-index bisector.
    pub regular_steps: u32,
    /// Steps taken by the line-weighted bisector.
    pub weighted_steps: u32,
    /// Strategy that needed strictly fewer steps, if either did.
    pub winner: Option<Strategy>,
}

impl TrialOutcome {
    /// Run both strategies on `trial`.
    #[must_use]
    pub fn evaluate(commit_bound: usize, trial: &Trial) -> Self {
        let regular = bisect(Strategy::Regular, trial);
        let weighted = bisect(Strategy::Weighted, trial);
        debug_assert_eq!(regular.resolved_commit, trial.bad_commit());
        debug_assert_eq!(weighted.resolved_commit, trial.bad_commit());

        let winner = match regular.steps.cmp(&weighted.steps) {
            std::cmp::Ordering::Less => Some(Strategy::Regular),
            std::cmp::Ordering::Greater => Some(Strategy::Weighted),
            std::cmp::Ordering::Equal => None,
        };
        Self {
            commit_bound,
            commit_count: trial.commit_count(),
            total_lines: trial.total_lines(),
            bad_commit: trial.bad_commit(),
            regular_steps: regular.steps,
            weighted_steps: weighted.steps,
            winner,
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Running step statistics for one strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StepStats {
    /// Samples recorded.
    pub count: u64,
    /// Sum of all step counts.
    pub total: u64,
    /// Largest step count seen.
    pub max: u32,
    #[serde(skip)]
    sum_squares: f64,
}

impl StepStats {
    /// Add one sample.
    pub fn record(&mut self, steps: u32) {
        self.count += 1;
        self.total += u64::from(steps);
        self.max = self.max.max(steps);
        self.sum_squares += f64::from(steps) * f64::from(steps);
    }

    /// Mean steps, or 0 with no samples.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total as f64 / self.count as f64
    }

    /// Population standard deviation of the step counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn std_dev(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let variance = mean.mul_add(-mean, self.sum_squares / self.count as f64);
        variance.max(0.0).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// Aggregate over every trial of a simulation.
///
/// `regular_wins + weighted_wins + ties == trials` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Tally {
    /// Trials run.
    pub trials: u64,
    /// Trials where the commit-index bisector needed fewer steps.
    pub regular_wins: u64,
    /// Trials where the line-weighted bisector needed fewer steps.
    pub weighted_wins: u64,
    /// Trials where both needed the same number of steps.
    pub ties: u64,
    /// Step statistics for the commit-index bisector.
    pub regular: StepStats,
    /// Step statistics for the line-weighted bisector.
    pub weighted: StepStats,
}

impl Tally {
    /// Fold one trial into the tally.
    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        match outcome.winner {
            Some(Strategy::Regular) => self.regular_wins += 1,
            Some(Strategy::Weighted) => self.weighted_wins += 1,
            None => self.ties += 1,
        }
        self.regular.record(outcome.regular_steps);
        self.weighted.record(outcome.weighted_steps);
    }

    /// Wins for `strategy`.
    #[must_use]
    pub const fn wins(&self, strategy: Strategy) -> u64 {
        match strategy {
            Strategy::Regular => self.regular_wins,
            Strategy::Weighted => self.weighted_wins,
        }
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Run the full sweep, calling `on_trial` after every trial.
///
/// # Errors
/// Returns [`SimError`] if the parameters fail [`SimParams::validate`].
pub fn run<R, F>(params: &SimParams, rng: &mut R, mut on_trial: F) -> Result<Tally, SimError>
where
    R: Rng,
    F: FnMut(&TrialOutcome),
{
    params.validate()?;
    let generator = TrialGenerator::new(params.max_lines_per_commit, params.fault_mode)?;
    let mut tally = Tally::default();

    tracing::info!(
        max_commits = params.max_commits,
        max_lines_per_commit = params.max_lines_per_commit,
        runs = params.runs,
        fault_mode = %params.fault_mode,
        planned_trials = params.planned_trials(),
        "starting simulation"
    );

    for commit_bound in params.commit_bounds() {
        let _span = tracing::debug_span!("commit_bound", bound = commit_bound).entered();
        for _ in 0..params.runs {
            let trial = generator.generate(rng, commit_bound)?;
            let outcome = TrialOutcome::evaluate(commit_bound, &trial);
            tracing::debug!(
                commits = outcome.commit_count,
                lines = outcome.total_lines,
                bad_commit = outcome.bad_commit,
                regular = outcome.regular_steps,
                weighted = outcome.weighted_steps,
                "trial"
            );
            tally.record(&outcome);
            on_trial(&outcome);
        }
    }

    tracing::info!(
        trials = tally.trials,
        regular_wins = tally.regular_wins,
        weighted_wins = tally.weighted_wins,
        ties = tally.ties,
        "simulation finished"
    );
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params(max_commits: usize, max_lines_per_commit: u64, runs: u64) -> SimParams {
        SimParams {
            max_commits,
            max_lines_per_commit,
            runs,
            fault_mode: FaultMode::Line,
        }
    }

    #[test]
    fn degenerate_bounds_run_nothing() {
        for max_commits in [0, 1, 2, 3] {
            let mut calls = 0;
            let mut rng = StdRng::seed_from_u64(0);
            let tally = run(&params(max_commits, 10, 5), &mut rng, |_| calls += 1).unwrap();
            assert_eq!(tally, Tally::default());
            assert_eq!(calls, 0);
        }
    }

    #[test]
    fn zero_runs_is_empty() {
        let tally = run(&params(20, 10, 0), &mut StdRng::seed_from_u64(0), |_| {}).unwrap();
        assert_eq!(tally.trials, 0);
    }

    #[test]
    fn zero_line_bound_is_rejected() {
        let p = params(20, 0, 5);
        assert!(p.validate().is_err());
        assert!(run(&p, &mut StdRng::seed_from_u64(0), |_| {}).is_err());
    }

    #[test]
    fn oversized_line_bound_is_rejected() {
        let p = params(6, u64::MAX, 3);
        let err = p.validate().unwrap_err();
        assert!(
            matches!(err, SimError::InvalidConfig { field: "max_lines_per_commit", .. }),
            "{err}"
        );
        let mut calls = 0;
        assert_eq!(
            run(&p, &mut StdRng::seed_from_u64(1), |_| calls += 1),
            Err(err)
        );
        assert_eq!(calls, 0);
    }

    #[test]
    fn oversized_line_bound_is_fine_when_sweep_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let tally = run(&params(3, u64::MAX, 3), &mut rng, |_| {}).unwrap();
        assert_eq!(tally.trials, 0);
    }

    #[test]
    fn line_bound_at_the_overflow_limit_runs() {
        // Bounds 3..6 draw at most 5 commits, so 5 * (u64::MAX / 5) still fits.
        let p = params(6, u64::MAX / 5, 3);
        p.validate().unwrap();
        let tally = run(&p, &mut StdRng::seed_from_u64(1), |o| {
            assert!(o.total_lines >= 3);
        })
        .unwrap();
        assert_eq!(tally.trials, 9);
        assert!(params(6, u64::MAX / 5 + 1, 3).validate().is_err());
    }

    #[test]
    fn counts_every_trial_once() {
        let p = params(10, 50, 4);
        let mut bounds = Vec::new();
        let mut rng = StdRng::seed_from_u64(5);
        let tally = run(&p, &mut rng, |o| bounds.push(o.commit_bound)).unwrap();

        assert_eq!(tally.trials, 7 * 4);
        assert_eq!(tally.trials, p.planned_trials());
        assert_eq!(tally.regular_wins + tally.weighted_wins + tally.ties, tally.trials);
        assert_eq!(tally.regular.count, tally.trials);
        assert_eq!(bounds.len(), 28);
        assert_eq!(bounds.first(), Some(&3));
        assert_eq!(bounds.last(), Some(&9));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let p = params(30, 100, 10);
        let a = run(&p, &mut StdRng::seed_from_u64(42), |_| {}).unwrap();
        let b = run(&p, &mut StdRng::seed_from_u64(42), |_| {}).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn evaluate_picks_strict_winner() {
        let trial = Trial::new(vec![5, 1, 1], 2).unwrap();
        let outcome = TrialOutcome::evaluate(3, &trial);
        assert_eq!(outcome.regular_steps, 1);
        assert_eq!(outcome.weighted_steps, 2);
        assert_eq!(outcome.winner, Some(Strategy::Regular));

        let trial = Trial::new(vec![1, 1, 1, 9], 3).unwrap();
        let outcome = TrialOutcome::evaluate(4, &trial);
        assert_eq!(outcome.winner, Some(Strategy::Weighted));
    }

    #[test]
    fn ties_are_counted_separately() {
        // Middle commit and middle line coincide: both hit on the first probe.
        let trial = Trial::new(vec![1, 2, 1], 1).unwrap();
        let outcome = TrialOutcome::evaluate(3, &trial);
        assert_eq!(outcome.winner, None);

        let mut tally = Tally::default();
        tally.record(&outcome);
        assert_eq!(tally.ties, 1);
        assert_eq!(tally.wins(Strategy::Regular), 0);
        assert_eq!(tally.wins(Strategy::Weighted), 0);
    }

    #[test]
    fn step_stats_mean_and_deviation() {
        let mut stats = StepStats::default();
        assert!(stats.mean().abs() < f64::EPSILON);
        for steps in [2, 4, 4, 4, 5, 5, 7, 9] {
            stats.record(steps);
        }
        assert_eq!(stats.count, 8);
        assert_eq!(stats.max, 9);
        assert!((stats.mean() - 5.0).abs() < 1e-9);
        assert!((stats.std_dev() - 2.0).abs() < 1e-9);
    }
}
