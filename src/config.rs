//! Optional run configuration (`linebisect.toml`).
//!
//! Holds the settings that are not positional arguments: the random seed,
//! how faults are placed, and how results are printed. Every field has a
//! default, and command-line flags override whatever the file says.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::format::OutputFormat;
use crate::trial::FaultMode;

/// Conventional file name looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "linebisect.toml";

/// Top-level configuration.
///
/// Missing fields use defaults. Missing file → all defaults (no error).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Trial generation settings.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Report settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Trial generation settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Fixed seed. When absent the generator is seeded from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Fault placement (default: `"line"`).
    #[serde(default)]
    pub fault_mode: FaultMode,
}

/// Report settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Report format (default: `"text"`).
    #[serde(default)]
    pub format: OutputFormat,

    /// Print one line per trial (default: `true`).
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            progress: default_progress(),
        }
    }
}

const fn default_progress() -> bool {
    true
}

/// Why a configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The contents are not valid TOML or do not fit [`RunConfig`].
    #[error("{}{}{message}", origin(.path.as_deref()), location(.line.as_ref()))]
    Invalid {
        /// File the text came from, if it came from a file.
        path: Option<PathBuf>,
        /// 1-based line of the offending key or value.
        line: Option<usize>,
        message: String,
    },
}

fn origin(path: Option<&Path>) -> String {
    path.map_or_else(|| "config error: ".to_owned(), |p| format!("{}: ", p.display()))
}

fn location(line: Option<&usize>) -> String {
    line.map(|n| format!("line {n}: ")).unwrap_or_default()
}

impl ConfigError {
    fn in_file(self, file: &Path) -> Self {
        match self {
            Self::Invalid { line, message, .. } => Self::Invalid {
                path: Some(file.to_owned()),
                line,
                message,
            },
            read @ Self::Read { .. } => read,
        }
    }
}

/// 1-based line containing byte `offset` of `text`.
fn line_at(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

impl RunConfig {
    /// Read `path`, or fall back to [`RunConfig::default`] if it does not exist.
    ///
    /// # Errors
    /// [`ConfigError::Read`] if the file exists but is unreadable,
    /// [`ConfigError::Invalid`] if its contents are rejected.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map_err(|e| e.in_file(path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_owned(),
                source,
            }),
        }
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] on malformed TOML, unknown keys or bad values.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Invalid {
            path: None,
            line: e.span().map(|span| line_at(text, span.start)),
            message: e.message().to_owned(),
        })
    }
}
