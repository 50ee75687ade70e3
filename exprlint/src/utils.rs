//! Shared helpers: offset/line mapping, suppression comments, file walking.

use crate::constants;
use ignore::WalkBuilder;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

/// Helper for mapping byte offsets to line numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    /// Uses byte iteration since '\n' is always a single byte in UTF-8.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: usize) -> usize {
        // Binary search to find which line range the offset falls into.
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Converts a byte offset to 1-indexed (line, column).
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_index(offset);
        let line_start = self.line_starts[line - 1];
        (line, offset - line_start + 1)
    }
}

/// Suppression specification.
#[derive(Debug, Clone, PartialEq)]
pub enum Suppression {
    /// Suppress all findings.
    All,
    /// Suppress findings for specific rule IDs.
    Specific(FxHashSet<String>),
}

/// Detects suppression specification for a line.
///
/// Supports two formats:
/// - `# noqa` - Bare ignore (All)
/// - `# noqa: EXL-W001, EXL-E001` - Specific codes
#[must_use]
pub fn get_line_suppression(line: &str) -> Option<Suppression> {
    let re = constants::SUPPRESSION_RE();
    let caps = re.captures(line)?;

    if let Some(codes_match) = caps.get(1) {
        let mut specific_rules = FxHashSet::default();
        for code in codes_match.as_str().split(',').map(str::trim) {
            let c = code.to_uppercase();
            if c == "EXL" {
                return Some(Suppression::All); // Generic "EXL" suppresses all
            }
            specific_rules.insert(c);
        }
        if !specific_rules.is_empty() {
            return Some(Suppression::Specific(specific_rules));
        }
        return None;
    }

    // Bare `# noqa` with no codes
    Some(Suppression::All)
}

/// Detects lines with suppression comments in a source file.
///
/// Returns a map of line numbers (1-indexed) to suppression specs.
#[must_use]
pub fn get_ignored_lines(source: &str) -> FxHashMap<usize, Suppression> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, line)| get_line_suppression(line).map(|suppression| (i + 1, suppression)))
        .collect()
}

/// Checks if a specific line and rule are suppressed.
#[must_use]
pub fn is_line_suppressed(
    ignored_lines: &FxHashMap<usize, Suppression>,
    line: usize,
    rule_id: &str,
) -> bool {
    match ignored_lines.get(&line) {
        Some(Suppression::All) => true,
        Some(Suppression::Specific(rules)) => rules.contains(&rule_id.to_uppercase()),
        None => false,
    }
}

/// Checks if any path component matches an exclusion entry.
#[must_use]
pub fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    path.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        exclude.iter().any(|entry| entry.as_str() == name)
            || constants::DEFAULT_EXCLUDE_FOLDERS().contains(name.as_ref())
    })
}

/// Collects expression files under `root`, gitignore-aware.
///
/// A file path is returned as-is; a directory is walked recursively and every
/// `.expr` file not in an excluded folder is collected, sorted for stable
/// output.
#[must_use]
pub fn collect_expr_files(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .build()
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext == constants::EXPR_EXTENSION)
                && !is_excluded(path, exclude)
        })
        .collect();
    files.sort();
    files
}

/// Normalizes a path for display (forward slashes on every platform).
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
