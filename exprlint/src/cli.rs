use clap::{Args, Parser};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.exprlint.toml):
  Create this file in your project root to set defaults.

  [exprlint]
  # Rule codes to skip entirely
  ignore = [\"EXL-E001\"]

  # Path filters
  exclude_folders = [\"legacy\", \"generated\"]

  # CI/CD
  fail_on_findings = true    # Exit 1 when findings remain
";

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging (shows files being analyzed).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: show only the summary (no detailed table).
    #[arg(long)]
    pub quiet: bool,
}

/// Options controlling the fix flow.
#[derive(Args, Debug, Default, Clone)]
pub struct FixArgs {
    /// Auto-fix findings that carry a rewrite (reverses `a > b` into `b < a`).
    /// By default, shows a preview of what would be changed (dry-run).
    /// Use --apply to actually modify files.
    #[arg(long)]
    pub fix: bool,

    /// Apply the fixes to files (use with --fix).
    /// Without this flag, --fix only shows a preview of what would be changed.
    #[arg(short = 'a', long)]
    pub apply: bool,
}

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "exprlint - Static analysis for expression files: operand ordering checks with auto-fix",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Paths to analyze (files or directories).
    /// Can be a single directory, multiple files, or a mix of both.
    /// When no paths are provided, defaults to the current directory.
    pub paths: Vec<PathBuf>,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,

    /// Fix flow options.
    #[command(flatten)]
    pub fix: FixArgs,

    /// Folders to exclude from analysis.
    #[arg(long, alias = "exclude-folder")]
    pub exclude_folders: Vec<String>,

    /// Rule codes to ignore (repeatable).
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Exit with code 1 if any findings are reported.
    #[arg(long)]
    pub fail_on_findings: bool,
}
