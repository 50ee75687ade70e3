//! Command execution: the check (default) and fix flows.
//!
//! Both functions write human- or JSON-formatted output to the injected
//! writer and return the number of findings left standing, which the entry
//! point turns into an exit code.

use crate::config::Config;
use crate::linter::{fix_source, lint_source, AppliedFix, LintOutcome};
use crate::output;
use crate::rules::Finding;
use crate::utils::collect_expr_files;
use anyhow::{Context as _, Result};
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Options for the check flow.
#[derive(Debug, Default, Clone)]
pub struct CheckOptions {
    /// Output raw JSON.
    pub json: bool,
    /// Show only the summary.
    pub quiet: bool,
    /// Show files being analyzed.
    pub verbose: bool,
    /// Folders to exclude.
    pub exclude: Vec<String>,
    /// Loaded configuration.
    pub config: Config,
}

/// Options for the fix flow.
#[derive(Debug, Default, Clone)]
pub struct FixOptions {
    /// Write fixes back to disk; preview-only otherwise.
    pub apply: bool,
    /// Output raw JSON.
    pub json: bool,
    /// Show only the summary.
    pub quiet: bool,
    /// Show files being analyzed.
    pub verbose: bool,
    /// Folders to exclude.
    pub exclude: Vec<String>,
    /// Loaded configuration.
    pub config: Config,
}

/// Lints every expression file under `paths` and reports findings.
///
/// Returns the number of findings.
///
/// # Errors
///
/// Returns an error if a file cannot be read or output cannot be written.
pub fn run_check(
    paths: &[PathBuf],
    options: &CheckOptions,
    writer: &mut impl Write,
) -> Result<usize> {
    let files = collect_files(paths, &options.exclude);
    let progress = if options.json || options.quiet {
        indicatif::ProgressBar::hidden()
    } else {
        output::create_progress_bar(u64::try_from(files.len()).unwrap_or(u64::MAX))
    };

    let outcomes = files
        .par_iter()
        .map(|path| {
            if options.verbose && !options.json {
                eprintln!("[VERBOSE] analyzing {}", path.display());
            }
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let outcome = lint_source(&source, path, &options.config);
            progress.inc(1);
            Ok(outcome)
        })
        .collect::<Result<Vec<LintOutcome>>>();
    progress.finish_and_clear();
    let outcomes = outcomes?;

    let expressions: usize = outcomes.iter().map(|outcome| outcome.expressions).sum();
    let mut findings: Vec<Finding> = outcomes
        .into_iter()
        .flat_map(|outcome| outcome.findings)
        .collect();
    sort_findings(&mut findings);

    if options.json {
        output::print_json(writer, &findings, files.len(), expressions)?;
    } else {
        output::print_header(writer)?;
        if !findings.is_empty() && !options.quiet {
            output::print_findings_table(writer, &findings)?;
        }
        output::print_summary(writer, files.len(), expressions, &findings)?;
    }
    Ok(findings.len())
}

/// Applies (or previews) fixes for every expression file under `paths`.
///
/// Returns the number of findings that remain after fixing.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, if computed edits
/// are invalid, or if output cannot be written.
pub fn run_fix(paths: &[PathBuf], options: &FixOptions, writer: &mut impl Write) -> Result<usize> {
    let files = collect_files(paths, &options.exclude);

    let results = files
        .par_iter()
        .map(|path| {
            if options.verbose && !options.json {
                eprintln!("[VERBOSE] fixing {}", path.display());
            }
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let outcome = fix_source(&source, path, &options.config)
                .with_context(|| format!("failed to fix {}", path.display()))?;
            Ok((path.clone(), outcome))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut all_fixes: Vec<(PathBuf, AppliedFix)> = Vec::new();
    let mut remaining: Vec<Finding> = Vec::new();
    for (path, outcome) in results {
        if options.apply && !outcome.applied.is_empty() {
            fs::write(&path, &outcome.fixed)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        if !options.json && !options.quiet && !outcome.applied.is_empty() {
            output::print_file_fixes(writer, &path, &outcome.applied)?;
        }
        all_fixes.extend(outcome.applied.into_iter().map(|fix| (path.clone(), fix)));
        remaining.extend(outcome.findings);
    }
    sort_findings(&mut remaining);

    if options.json {
        output::print_fix_json(writer, &all_fixes, &remaining, options.apply)?;
    } else {
        if !remaining.is_empty() && !options.quiet {
            output::print_findings_table(writer, &remaining)?;
        }
        output::print_fix_summary(writer, all_fixes.len(), remaining.len(), options.apply)?;
    }
    Ok(remaining.len())
}

fn collect_files(paths: &[PathBuf], exclude: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = paths
        .iter()
        .flat_map(|path| collect_expr_files(path, exclude))
        .collect();
    files.sort();
    files.dedup();
    files
}

fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.line.cmp(&b.line))
            .then(a.col.cmp(&b.col))
            .then(a.rule_id.cmp(&b.rule_id))
    });
}
