//! Line accounting over a commit sequence.
//!
//! A commit sequence is a slice of per-commit line counts. Commit `i` owns
//! the inclusive, 1-based line range
//! `lines_below_commit(i) + 1 ..= cumulative_lines_through(i)`, and the
//! ranges of consecutive commits tile `1..=total_lines` without gaps.
//!
//! These functions do plain linear scans. The weighted bisector calls
//! [`commit_from_line`] once per probe; that cost is deliberately kept out of
//! the step count.

use std::ops::RangeInclusive;

/// Sum of the line counts of every commit with index `<= commit`.
///
/// `commit` past the end of the sequence is clamped, so the result is then
/// the total line count. An empty sequence yields 0.
#[must_use]
pub fn cumulative_lines_through(commit: usize, lines_per_commit: &[u64]) -> u64 {
    lines_per_commit.iter().take(commit.saturating_add(1)).sum()
}

/// Number of lines owned by the commits strictly before `commit`.
///
/// `commit` must be a valid index into `lines_per_commit`.
#[must_use]
pub fn lines_below_commit(commit: usize, lines_per_commit: &[u64]) -> u64 {
    lines_per_commit[..commit].iter().sum()
}

/// Total number of lines across the whole sequence.
#[must_use]
pub fn total_lines(lines_per_commit: &[u64]) -> u64 {
    lines_per_commit.iter().sum()
}

/// Total number of lines, or `None` if the sum does not fit in a `u64`.
#[must_use]
pub fn checked_total_lines(lines_per_commit: &[u64]) -> Option<u64> {
    lines_per_commit
        .iter()
        .try_fold(0_u64, |total, &lines| total.checked_add(lines))
}

/// Inclusive line range owned by `commit`.
#[must_use]
pub fn commit_line_range(commit: usize, lines_per_commit: &[u64]) -> RangeInclusive<u64> {
    let first = lines_below_commit(commit, lines_per_commit) + 1;
    first..=cumulative_lines_through(commit, lines_per_commit)
}

/// Index of the commit that owns `line`.
///
/// Returns the first commit whose cumulative total reaches `line`, so a
/// commit owns the line on its upper boundary. Line 0 resolves to commit 0.
/// A line past the end saturates to the last commit; an empty sequence
/// yields 0.
#[must_use]
pub fn commit_from_line(line: u64, lines_per_commit: &[u64]) -> usize {
    let mut accumulator = 0_u64;
    for (commit, &lines) in lines_per_commit.iter().enumerate() {
        accumulator = accumulator.saturating_add(lines);
        if accumulator >= line {
            return commit;
        }
    }
    lines_per_commit.len().saturating_sub(1)
}
