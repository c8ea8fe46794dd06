use std::io::{BufWriter, Write as _};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use linebisect::config::{DEFAULT_CONFIG_FILE, RunConfig};
use linebisect::format::{self, OutputFormat, Report};
use linebisect::{FaultMode, SimParams, sim, telemetry};

/// Compare commit-index bisection with line-weighted bisection
///
/// For every commit bound from 3 up to (but excluding) MAX_COMMITS, RUNS
/// random histories are drawn. Each history has between 3 and the bound
/// commits, each commit between 1 and MAX_LINES_PER_COMMIT lines, and one
/// bad commit. Both strategies search for the bad commit; the one needing
/// fewer steps scores a win.
///
/// OUTPUT:
///
///   One line per trial (unless --quiet), then a summary with the total
///   trial count, both win tallies, ties and per-strategy step statistics.
///
/// CONFIGURATION:
///
///   Settings other than the three counts can also come from a TOML file
///   (default: ./linebisect.toml). Flags override the file.
///
///   Set LINEBISECT_LOG=text or LINEBISECT_LOG=json for diagnostics on stderr.
#[derive(Parser)]
#[command(name = "linebisect")]
#[command(version, about)]
struct Cli {
    /// Exclusive upper end of the commit-bound sweep (>= 4 to run any trial)
    max_commits: usize,

    /// Largest number of lines a single commit may introduce (>= 1)
    max_lines_per_commit: u64,

    /// Trials per commit bound
    runs: u64,

    /// Seed for the random generator (default: drawn from OS entropy)
    #[arg(long, env = "LINEBISECT_SEED")]
    seed: Option<u64>,

    /// How the bad commit is chosen: `line` (weighted by size) or `commit`
    #[arg(long)]
    fault_mode: Option<FaultMode>,

    /// Output format: text or json
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Only print the summary
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the summary as pretty JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = RunConfig::load(&config_path)?;

    let params = SimParams {
        max_commits: cli.max_commits,
        max_lines_per_commit: cli.max_lines_per_commit,
        runs: cli.runs,
        fault_mode: cli.fault_mode.unwrap_or(config.simulation.fault_mode),
    };
    params.validate().context("invalid simulation parameters")?;

    let seed = cli
        .seed
        .or(config.simulation.seed)
        .unwrap_or_else(rand::random);
    let output_format = cli.format.unwrap_or(config.output.format);
    let progress = config.output.progress && !cli.quiet;
    tracing::debug!(
        seed,
        fault_mode = %params.fault_mode,
        ?output_format,
        progress,
        "resolved settings"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = BufWriter::new(std::io::stdout().lock());
    let mut write_error = None;

    let tally = sim::run(&params, &mut rng, |outcome| {
        if !progress || write_error.is_some() {
            return;
        }
        let written = output_format
            .progress_line(outcome)
            .and_then(|line| writeln!(out, "{line}").map_err(Into::into));
        if let Err(e) = written {
            write_error = Some(e);
        }
    })?;
    if let Some(e) = write_error {
        return Err(e.context("failed to write progress"));
    }

    let report = Report::new(seed, params, &tally);
    writeln!(out, "{}", output_format.summary(&report)?)?;
    out.flush()?;

    if let Some(path) = &cli.report {
        std::fs::write(path, format::report_json(&report)?)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    Ok(())
}
