//! Rich CLI output formatting: colored summaries, findings tables, progress.

use crate::linter::AppliedFix;
use crate::rules::Finding;
use crate::utils::normalize_display_path;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Create a progress bar with file count.
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
///
/// # Panics
///
/// Panics if the progress style template is invalid (should never happen with
/// the hardcoded template).
#[must_use]
pub fn create_progress_bar(total_files: u64) -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let pb =
        ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr_with_hz(20));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("linting...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.tick();
    pb
}

/// Print the main header with box-drawing characters.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        "╔════════════════════════════════════════╗".cyan()
    )?;
    writeln!(
        writer,
        "{}",
        "║  Expression Lint Results               ║".cyan().bold()
    )?;
    writeln!(
        writer,
        "{}",
        "╚════════════════════════════════════════╝".cyan()
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Print all findings as a table.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_findings_table(writer: &mut impl Write, findings: &[Finding]) -> std::io::Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["File", "Line", "Col", "Rule", "Severity", "Message", "Fix"]);

    for finding in findings {
        let severity_cell = match finding.severity.as_str() {
            "HIGH" | "CRITICAL" => Cell::new(&finding.severity).fg(Color::Red),
            "MEDIUM" => Cell::new(&finding.severity).fg(Color::Yellow),
            _ => Cell::new(&finding.severity).fg(Color::Green),
        };
        let fix_title = finding
            .fix
            .as_ref()
            .map_or(String::new(), |fix| fix.title.clone());
        table.add_row(vec![
            Cell::new(normalize_display_path(&finding.file)),
            Cell::new(finding.line),
            Cell::new(finding.col),
            Cell::new(&finding.rule_id),
            severity_cell,
            Cell::new(&finding.message),
            Cell::new(fix_title),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print summary with colored "pills".
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(
    writer: &mut impl Write,
    files: usize,
    expressions: usize,
    findings: &[Finding],
) -> std::io::Result<()> {
    let fixable = findings.iter().filter(|f| f.fix.is_some()).count();
    writeln!(
        writer,
        "{} {files} files, {expressions} expressions",
        "Scanned:".bold()
    )?;
    if findings.is_empty() {
        writeln!(writer, "{}", "[OK] No findings".green().bold())?;
    } else {
        writeln!(
            writer,
            "{} ({fixable} fixable with --fix)",
            format!("[!] {} findings", findings.len()).red().bold()
        )?;
    }
    Ok(())
}

/// Print lint results as JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn print_json(
    writer: &mut impl Write,
    findings: &[Finding],
    files: usize,
    expressions: usize,
) -> std::io::Result<()> {
    let fixable = findings.iter().filter(|f| f.fix.is_some()).count();
    let value = serde_json::json!({
        "summary": {
            "files": files,
            "expressions": expressions,
            "findings": findings.len(),
            "fixable": fixable,
        },
        "findings": findings,
    });
    let rendered = serde_json::to_string_pretty(&value).map_err(std::io::Error::other)?;
    writeln!(writer, "{rendered}")?;
    Ok(())
}

/// Print fix results as JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn print_fix_json(
    writer: &mut impl Write,
    fixes: &[(std::path::PathBuf, AppliedFix)],
    findings: &[Finding],
    applied: bool,
) -> std::io::Result<()> {
    let fixes: Vec<serde_json::Value> = fixes
        .iter()
        .map(|(file, fix)| {
            serde_json::json!({
                "file": normalize_display_path(file),
                "line": fix.line,
                "before": fix.before,
                "after": fix.after,
            })
        })
        .collect();
    let value = serde_json::json!({
        "applied": applied,
        "fixes": fixes,
        "findings": findings,
    });
    let rendered = serde_json::to_string_pretty(&value).map_err(std::io::Error::other)?;
    writeln!(writer, "{rendered}")?;
    Ok(())
}

/// Print the fixes for one file, preview-style.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_file_fixes(
    writer: &mut impl Write,
    file: &Path,
    fixes: &[AppliedFix],
) -> std::io::Result<()> {
    for fix in fixes {
        writeln!(
            writer,
            "  {}:{}  {}  {}  {}",
            normalize_display_path(file),
            fix.line,
            fix.before.dimmed(),
            "->".cyan(),
            fix.after.green()
        )?;
    }
    Ok(())
}

/// Print the fix-mode summary line.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_fix_summary(
    writer: &mut impl Write,
    total_fixes: usize,
    remaining: usize,
    applied: bool,
) -> std::io::Result<()> {
    if total_fixes == 0 {
        writeln!(writer, "{}", "[OK] Nothing to fix".green().bold())?;
    } else if applied {
        writeln!(
            writer,
            "{}",
            format!("[OK] {total_fixes} fixes applied").green().bold()
        )?;
    } else {
        writeln!(
            writer,
            "{}",
            format!("[i] {total_fixes} fixes available (re-run with --apply to write them)")
                .yellow()
                .bold()
        )?;
    }
    if remaining > 0 {
        writeln!(writer, "{remaining} findings remain unfixed")?;
    }
    Ok(())
}
