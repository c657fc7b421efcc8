use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DashboardError;
use crate::report::markdown::default_dashboard_path;

/// Testing root used when neither the CLI nor the config file names one.
pub const DEFAULT_TESTING_DIR: &str = "Testing";

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ctest-dashboard.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ctest-dashboard",
    version,
    about = "Render a markdown dashboard from CTest JUnit XML results"
)]
pub struct Cli {
    /// Testing directory containing run*/results.xml (default: Testing)
    pub root: Option<PathBuf>,

    /// Dashboard output path (default: <ROOT>/dashboard/test-dashboard.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// What to print on stdout after the dashboard is written
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to config file (default: ctest-dashboard.yaml in current dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Short pass/fail summary
    #[default]
    Console,
    /// The rendered markdown document
    Markdown,
    /// JSON summary with totals, failures and skipped files
    Json,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `ctest-dashboard.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub testing_dir: Option<PathBuf>,

    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// Load the config file.
///
/// An explicit `path` must exist and parse. Without one, the default file is
/// optional and a malformed default file falls back to defaults with a warning.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, DashboardError> {
    match path {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|e| DashboardError::Config {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            serde_yaml::from_str(&content).map_err(|e| DashboardError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
        None => match std::fs::read_to_string(DEFAULT_CONFIG_FILE) {
            Ok(content) => serde_yaml::from_str(&content).or_else(|e| {
                warn!(path = DEFAULT_CONFIG_FILE, error = %e, "ignoring malformed config file");
                Ok(AppConfig::default())
            }),
            Err(_) => Ok(AppConfig::default()),
        },
    }
}

// ============================================================================
// Option resolution (CLI > config > defaults)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub root: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
}

/// Merge CLI arguments over the config file over built-in defaults.
pub fn resolve_options(cli: &Cli, config: &AppConfig) -> RenderOptions {
    let root = cli
        .root
        .clone()
        .or_else(|| config.testing_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TESTING_DIR));
    let output = cli
        .output
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| default_dashboard_path(&root));
    let format = cli.format.or(config.format).unwrap_or_default();

    RenderOptions {
        root,
        output,
        format,
    }
}
