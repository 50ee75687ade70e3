//! Core library for the exprlint static analysis tool.
//!
//! exprlint lints expression files (one infix expression per line) for
//! comparisons written against number-line order: `a > b` is flagged and can
//! be rewritten in place as `b < a`. The library exposes the arena syntax
//! tree, the parser, the traversal machinery, the rule set and the fix
//! infrastructure; the binary wires them to a CLI.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module containing the arena-backed expression tree.
/// Nodes are addressed by index and carry parent back-references.
pub mod ast;

/// Module containing the lexer and parser for expression files.
pub mod parser;

/// Module containing the traversal machinery: node-kind tags, the dispatch
/// table and the depth-first walk.
pub mod visitor;

/// Module containing the rule trait, the finding model and the shipped rules.
pub mod rules;

/// Module containing fix infrastructure: the tree rewrite and the byte-range
/// text rewriter.
pub mod fix;

/// Module containing the per-file lint and fix orchestration.
pub mod linter;

/// Module for loading configuration.
pub mod config;

/// Module containing utility functions.
/// This includes offset/line mapping, suppression comments and file walking.
pub mod utils;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module for rich CLI output formatting with colored text and tables.
pub mod output;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI commands and their execution logic.
pub mod commands;

/// Module defining the shared entry point used by every binary.
pub mod entry_point;
