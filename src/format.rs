use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

use crate::bisect::Strategy;
use crate::sim::{SimParams, StepStats, Tally, TrialOutcome};

/// Output format for progress lines and the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain `key=value` lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => bail!("Invalid format '{}'. Use: text or json", s),
        }
    }
}

/// Per-strategy figures in a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategySummary {
    pub wins: u64,
    pub mean_steps: f64,
    pub std_dev_steps: f64,
    pub max_steps: u32,
}

impl StrategySummary {
    fn new(wins: u64, stats: &StepStats) -> Self {
        Self {
            wins,
            mean_steps: stats.mean(),
            std_dev_steps: stats.std_dev(),
            max_steps: stats.max,
        }
    }
}

/// Everything needed to reproduce and interpret a finished simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Seed the generator was built from.
    pub seed: u64,
    pub params: SimParams,
    pub trials: u64,
    pub ties: u64,
    pub regular: StrategySummary,
    pub weighted: StrategySummary,
}

impl Report {
    #[must_use]
    pub fn new(seed: u64, params: SimParams, tally: &Tally) -> Self {
        Self {
            seed,
            params,
            trials: tally.trials,
            ties: tally.ties,
            regular: StrategySummary::new(tally.wins(Strategy::Regular), &tally.regular),
            weighted: StrategySummary::new(tally.wins(Strategy::Weighted), &tally.weighted),
        }
    }
}

impl OutputFormat {
    /// Render one trial as a single line.
    pub fn progress_line(self, outcome: &TrialOutcome) -> Result<String> {
        match self {
            Self::Text => Ok(format!(
                "bound={} commits={} regular={} weighted={}",
                outcome.commit_bound,
                outcome.commit_count,
                outcome.regular_steps,
                outcome.weighted_steps
            )),
            Self::Json => serde_json::to_string(outcome)
                .map_err(|e| anyhow::anyhow!("JSON serialization failed: {}", e)),
        }
    }

    /// Render the end-of-run summary.
    ///
    /// In text form the per-strategy step statistics come first and the
    /// tally line is always the last line.
    pub fn summary(self, report: &Report) -> Result<String> {
        match self {
            Self::Text => {
                let mut out = String::new();
                for (name, s) in [("regular", &report.regular), ("weighted", &report.weighted)] {
                    writeln!(
                        out,
                        "{name}: mean_steps={:.3} sd={:.3} max={}",
                        s.mean_steps, s.std_dev_steps, s.max_steps
                    )?;
                }
                write!(
                    out,
                    "trials={} regular_wins={} weighted_wins={} ties={} seed={}",
                    report.trials,
                    report.regular.wins,
                    report.weighted.wins,
                    report.ties,
                    report.seed
                )?;
                Ok(out)
            }
            Self::Json => serde_json::to_string(report)
                .map_err(|e| anyhow::anyhow!("JSON serialization failed: {}", e)),
        }
    }
}

/// Pretty JSON for the `--report` file.
pub fn report_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| anyhow::anyhow!("JSON serialization failed: {}", e))
}
