//! Tests for the fix flow: operand swap, no-op guards, text preservation.

#![allow(clippy::unwrap_used)]

use exprlint::config::Config;
use exprlint::linter::{fix_source, lint_source};
use std::path::Path;

fn fix(source: &str) -> exprlint::linter::FixOutcome {
    fix_source(source, Path::new("rules.expr"), &Config::default()).unwrap()
}

#[test]
fn test_swap_simple_comparison() {
    let outcome = fix("x > 5\n");
    assert_eq!(outcome.fixed, "5 < x\n");
    assert_eq!(outcome.applied.len(), 1);
    assert_eq!(outcome.applied[0].line, 1);
    assert_eq!(outcome.applied[0].before, "x > 5");
    assert_eq!(outcome.applied[0].after, "5 < x");
    assert!(outcome.findings.is_empty());
}

#[test]
fn test_fixed_output_is_clean() {
    // the rewrite result carries `<`, which the detector never flags
    let outcome = fix("x > 5\n");
    let relint = lint_source(&outcome.fixed, Path::new("rules.expr"), &Config::default());
    assert!(relint.findings.is_empty());
}

#[test]
fn test_fix_is_stable_on_clean_input() {
    let outcome = fix("5 < x\na <= b\n");
    assert_eq!(outcome.fixed, "5 < x\na <= b\n");
    assert!(outcome.applied.is_empty());
}

#[test]
fn test_missing_right_operand_left_untouched() {
    let source = "a > \n";
    let outcome = fix(source);
    assert_eq!(outcome.fixed, source);
    assert!(outcome.applied.is_empty());
    // the finding stands, it just cannot be fixed
    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].rule_id, "EXL-W001");
}

#[test]
fn test_operand_text_preserved() {
    let outcome = fix("count+1 > limit*2\n");
    assert_eq!(outcome.fixed, "limit*2 < count+1\n");
}

#[test]
fn test_surrounding_lines_untouched() {
    let source = "# thresholds\na < 1\nx > 5\nb <= 2\n";
    let outcome = fix(source);
    assert_eq!(outcome.fixed, "# thresholds\na < 1\n5 < x\nb <= 2\n");
    assert_eq!(outcome.applied.len(), 1);
    assert_eq!(outcome.applied[0].line, 3);
}

#[test]
fn test_trailing_comment_preserved() {
    let outcome = fix("x > 5  # threshold\n");
    assert_eq!(outcome.fixed, "5 < x  # threshold\n");
}

#[test]
fn test_two_fixes_on_one_line() {
    let outcome = fix("a > 1 && b > 2\n");
    assert_eq!(outcome.fixed, "1 < a && 2 < b\n");
    assert_eq!(outcome.applied.len(), 1);
}

#[test]
fn test_chained_comparison_keeps_grouping() {
    // left-associative parse: (a > b) > c; both nodes are rewritten and the
    // inner result is parenthesized so the structure survives round-trip
    let outcome = fix("a > b > c\n");
    assert_eq!(outcome.fixed, "c < (b < a)\n");
}

#[test]
fn test_grouped_operand_moves_verbatim() {
    let outcome = fix("(a + b) > c\n");
    assert_eq!(outcome.fixed, "c < (a + b)\n");
}

#[test]
fn test_suppressed_line_not_fixed() {
    let source = "x > 5  # noqa\n";
    let outcome = fix(source);
    assert_eq!(outcome.fixed, source);
    assert!(outcome.applied.is_empty());
    assert!(outcome.findings.is_empty());
}

#[test]
fn test_multiple_lines_fixed_in_one_pass() {
    let outcome = fix("a > 1\nb > 2\nc < 3\n");
    assert_eq!(outcome.fixed, "1 < a\n2 < b\nc < 3\n");
    assert_eq!(outcome.applied.len(), 2);
    assert_eq!(outcome.applied[0].line, 1);
    assert_eq!(outcome.applied[1].line, 2);
}

#[test]
fn test_parse_error_lines_survive_fixing() {
    let outcome = fix("a $ b\nx > 5\n");
    assert_eq!(outcome.fixed, "a $ b\n5 < x\n");
    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].rule_id, "EXL-E001");
}

#[test]
fn test_last_line_without_newline() {
    let outcome = fix("x > 5");
    assert_eq!(outcome.fixed, "5 < x");
}
