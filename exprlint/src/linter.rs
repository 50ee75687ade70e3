//! Per-file lint orchestration.
//!
//! `lint_source` parses each line, walks the tree through the dispatch table
//! and collects rule findings. `fix_source` additionally applies the tree
//! rewrites for fixable findings and materializes them as byte-range text
//! edits, leaving everything else in the file untouched.

use crate::ast::ExprArena;
use crate::config::Config;
use crate::fix::{reverse_inequality, ByteRangeRewriter, Edit, RewriteError};
use crate::parser::{self, ParseError};
use crate::rules::ids::RULE_ID_PARSE_ERROR;
use crate::rules::order::REVERSE_INEQUALITY;
use crate::rules::{get_rules, Context, Finding, Rule};
use crate::utils::{get_ignored_lines, is_line_suppressed, LineIndex, Suppression};
use crate::visitor::{walk, DispatchTable, NodeKind};
use rustc_hash::FxHashMap;
use std::path::Path;

/// Outcome of linting one source file.
#[derive(Debug, Clone)]
pub struct LintOutcome {
    /// All findings, in source order. Parse failures are reported as
    /// findings under their own rule id.
    pub findings: Vec<Finding>,
    /// Number of expressions successfully parsed.
    pub expressions: usize,
}

/// One applied (or previewed) fix.
#[derive(Debug, Clone)]
pub struct AppliedFix {
    /// Line number (1-indexed) of the rewritten expression.
    pub line: usize,
    /// Expression text before the rewrite.
    pub before: String,
    /// Expression text after the rewrite.
    pub after: String,
}

/// Outcome of fixing one source file.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    /// The rewritten source.
    pub fixed: String,
    /// Fixes that ran, in source order.
    pub applied: Vec<AppliedFix>,
    /// Findings that remain after fixing (not fixable, or declined).
    pub findings: Vec<Finding>,
}

/// Lints `source` and returns all findings.
#[must_use]
pub fn lint_source(source: &str, filename: &Path, config: &Config) -> LintOutcome {
    let context = Context {
        filename: filename.to_path_buf(),
        line_index: LineIndex::new(source),
        config: config.clone(),
    };
    let ignored = get_ignored_lines(source);
    let mut rules = get_rules(config);
    let mut findings = Vec::new();
    let mut expressions = 0usize;

    let mut offset = 0;
    for raw_line in source.split_inclusive('\n') {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        match parser::parse_line(line, offset) {
            Ok(Some(arena)) => {
                expressions += 1;
                findings.extend(run_rules(&arena, &mut rules, &context));
            }
            Ok(None) => {}
            Err(err) => {
                if let Some(finding) = parse_error_finding(&err, &context) {
                    findings.push(finding);
                }
            }
        }
        offset += raw_line.len();
    }

    findings.retain(|finding| !is_suppressed(&ignored, finding));
    LintOutcome {
        findings,
        expressions,
    }
}

/// Lints `source`, applies every applicable fix, and returns the rewritten
/// text together with the findings that remain.
pub fn fix_source(
    source: &str,
    filename: &Path,
    config: &Config,
) -> Result<FixOutcome, RewriteError> {
    let context = Context {
        filename: filename.to_path_buf(),
        line_index: LineIndex::new(source),
        config: config.clone(),
    };
    let ignored = get_ignored_lines(source);
    let mut rules = get_rules(config);
    let mut rewriter = ByteRangeRewriter::new(source);
    let mut applied = Vec::new();
    let mut remaining = Vec::new();

    let mut offset = 0;
    for raw_line in source.split_inclusive('\n') {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        match parser::parse_line(line, offset) {
            Ok(Some(mut arena)) => {
                let findings = run_rules(&arena, &mut rules, &context);
                let expr_span = arena.root().map(|root| arena.node(root).span);
                let mut line_changed = false;
                for finding in findings {
                    if is_suppressed(&ignored, &finding) {
                        continue;
                    }
                    if finding.fix.is_some() {
                        if let Some(node) = finding.node {
                            if reverse_inequality(&mut arena, node).is_some() {
                                line_changed = true;
                                continue;
                            }
                        }
                    }
                    remaining.push(finding);
                }
                if line_changed {
                    if let (Some(root), Some(span)) = (arena.root(), expr_span) {
                        let after = arena.render(root, source);
                        let before = span.slice(source).to_owned();
                        let (line_no, _) = context.line_index.line_col(span.start);
                        rewriter.add_edit(Edit::with_description(
                            span.start,
                            span.end,
                            after.clone(),
                            REVERSE_INEQUALITY,
                        ));
                        applied.push(AppliedFix {
                            line: line_no,
                            before,
                            after,
                        });
                    }
                }
            }
            Ok(None) => {}
            Err(err) => {
                if let Some(finding) = parse_error_finding(&err, &context) {
                    if !is_suppressed(&ignored, &finding) {
                        remaining.push(finding);
                    }
                }
            }
        }
        offset += raw_line.len();
    }

    let fixed = rewriter.apply()?;
    Ok(FixOutcome {
        fixed,
        applied,
        findings: remaining,
    })
}

/// Walks `arena` once, dispatching subscribed rules per node kind, and
/// returns their findings in source order.
fn run_rules(
    arena: &ExprArena,
    rules: &mut [Box<dyn Rule>],
    context: &Context,
) -> Vec<Finding> {
    struct State<'r, 'c> {
        rules: &'r mut [Box<dyn Rule>],
        context: &'c Context,
        findings: Vec<Finding>,
    }

    let Some(root) = arena.root() else {
        return Vec::new();
    };

    // Group rules by the node kinds they subscribe to; each kind gets one
    // handler that runs exactly those rules.
    let mut by_kind: FxHashMap<NodeKind, Vec<usize>> = FxHashMap::default();
    for (index, rule) in rules.iter().enumerate() {
        for kind in rule.kinds() {
            by_kind.entry(*kind).or_default().push(index);
        }
    }

    let mut table: DispatchTable<State> = DispatchTable::new();
    for (kind, indices) in by_kind {
        table.on(kind, move |arena, node, state: &mut State| {
            for &index in &indices {
                let context = state.context;
                if let Some(mut found) = state.rules[index].visit_expr(arena, node, context) {
                    state.findings.append(&mut found);
                }
            }
        });
    }

    let mut state = State {
        rules,
        context,
        findings: Vec::new(),
    };
    walk(arena, root, &mut table, &mut state);
    state.findings
}

fn parse_error_finding(err: &ParseError, context: &Context) -> Option<Finding> {
    if context.config.exprlint.is_ignored(RULE_ID_PARSE_ERROR) {
        return None;
    }
    let (line, col) = context.line_index.line_col(err.offset());
    Some(Finding {
        rule_id: RULE_ID_PARSE_ERROR.to_owned(),
        message: err.to_string(),
        file: context.filename.clone(),
        line,
        col,
        severity: "HIGH".to_owned(),
        node: None,
        fix: None,
    })
}

fn is_suppressed(ignored: &FxHashMap<usize, Suppression>, finding: &Finding) -> bool {
    is_line_suppressed(ignored, finding.line, &finding.rule_id)
}
