use crate::ast::{ExprArena, NodeId};
use crate::config::Config;
use crate::utils::LineIndex;
use crate::visitor::NodeKind;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone)]
/// Context passed to rules during analysis.
pub struct Context {
    /// Path to the file being analyzed.
    pub filename: PathBuf,
    /// Line index for accurate line/column mapping.
    pub line_index: LineIndex,
    /// Configuration settings.
    pub config: Config,
}

#[derive(Debug, Clone, Serialize)]
/// A single issue found by a rule.
pub struct Finding {
    /// ID of the rule that triggered the finding.
    pub rule_id: String,
    /// Description of the issue.
    pub message: String,
    /// File where the issue was found.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
    /// Severity level (e.g., "LOW", "HIGH").
    pub severity: String,
    /// Node the finding points at; absent for diagnostics without a tree
    /// position (parse errors). Only meaningful while the node's arena is
    /// alive.
    #[serde(skip)]
    pub node: Option<NodeId>,
    /// Remediation offered for this finding, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixAction>,
}

#[derive(Debug, Clone, Serialize)]
/// A remediation attached to a finding. The action has no identity beyond its
/// display name; the rewrite itself is parameterized by the flagged node at
/// application time.
pub struct FixAction {
    /// Display name of the fix.
    pub title: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
/// Metadata associated with a rule.
pub struct RuleMetadata {
    /// Unique code/ID of the rule.
    pub id: &'static str,
    /// Category of the rule.
    pub category: &'static str,
}

/// Trait defining a linting rule.
pub trait Rule: Send + Sync {
    /// Returns the descriptive name of the rule.
    fn name(&self) -> &'static str;
    /// Returns the unique code/ID of the rule.
    fn code(&self) -> &'static str {
        self.metadata().id
    }
    /// Returns the category/functional group of the rule.
    fn category(&self) -> &'static str {
        self.metadata().category
    }
    /// Returns the full metadata for the rule.
    fn metadata(&self) -> RuleMetadata;
    /// Node kinds this rule subscribes to; the traversal dispatches only
    /// these.
    fn kinds(&self) -> &'static [NodeKind];
    /// Called for every subscribed node, in source order.
    fn visit_expr(
        &mut self,
        _arena: &ExprArena,
        _node: NodeId,
        _context: &Context,
    ) -> Option<Vec<Finding>> {
        None
    }
}

/// Returns the rule set enabled by the given configuration.
#[must_use]
pub fn get_rules(config: &Config) -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(order::NumberLineOrderRule)];
    rules.retain(|rule| !config.exprlint.is_ignored(rule.code()));
    rules
}

/// Module containing rule ID constants.
pub mod ids;
/// Module containing the operand-ordering rules.
pub mod order;
