//! Shared entry point used by every binary.
//!
//! Parses CLI arguments, merges them with the loaded configuration and
//! dispatches to the check or fix flow. Output is written to an injected
//! writer so tests can capture it.

use crate::cli::Cli;
use crate::commands;
use crate::config::Config;
use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Runs the linter with the given arguments.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution
/// fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run exprlint with the given arguments, writing output to the specified
/// writer.
///
/// This is the testable version of `run_with_args` that allows output
/// capture.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution
/// fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["exprlint".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(cli) => cli,
        Err(e) => {
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    // Let clap print help/version as intended, but captured by
                    // the writer redirect
                    write!(writer, "{e}")?;
                    writer.flush()?;
                    return Ok(0);
                }
                _ => {
                    eprint!("{e}");
                    return Ok(1);
                }
            }
        }
    };

    // Load config from the first path or current directory
    let config_path = cli
        .paths
        .first()
        .map_or(Path::new("."), PathBuf::as_path);
    let mut config = Config::load_from_path(config_path);

    let mut exclude = config.exprlint.exclude_folders.clone().unwrap_or_default();
    exclude.extend(cli.exclude_folders.clone());

    // Fold --ignore into the config so the rule registry sees it
    if !cli.ignore.is_empty() {
        config
            .exprlint
            .ignore
            .get_or_insert_with(Vec::new)
            .extend(cli.ignore.iter().cloned());
    }

    if cli.output.verbose && !cli.output.json {
        eprintln!("[VERBOSE] exprlint v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("[VERBOSE] Using {} threads", rayon::current_num_threads());
        eprintln!("[VERBOSE] Excludes: {exclude:?}");
        eprintln!();
    }

    let paths = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };
    for path in &paths {
        if !path.exists() {
            eprintln!(
                "Error: The file or directory '{}' does not exist.",
                path.display()
            );
            return Ok(1);
        }
    }

    let fail_on_findings = cli.fail_on_findings || config.exprlint.fail_on_findings.unwrap_or(false);

    let findings = if cli.fix.fix {
        commands::run_fix(
            &paths,
            &commands::FixOptions {
                apply: cli.fix.apply,
                json: cli.output.json,
                quiet: cli.output.quiet,
                verbose: cli.output.verbose,
                exclude,
                config,
            },
            writer,
        )?
    } else {
        commands::run_check(
            &paths,
            &commands::CheckOptions {
                json: cli.output.json,
                quiet: cli.output.quiet,
                verbose: cli.output.verbose,
                exclude,
                config,
            },
            writer,
        )?
    };

    if fail_on_findings && findings > 0 {
        return Ok(1);
    }
    Ok(0)
}
