//! Depth-first traversal with tagged dispatch.
//!
//! Handlers are registered per node-kind tag in a [`DispatchTable`]; the walk
//! visits every node of the tree exactly once, in source order, parent before
//! children, and invokes the handler whose tag matches. Kinds without a
//! registered handler fall through to a no-op.

use crate::ast::{ExprArena, ExprKind, NodeId};
use rustc_hash::FxHashMap;

/// Node-kind tag used for handler dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Numeric literal.
    Number,
    /// Identifier reference.
    Ident,
    /// Prefix operator expression.
    Unary,
    /// Two-operand operator expression.
    Binary,
    /// Parenthesized expression.
    Group,
}

impl From<&ExprKind> for NodeKind {
    fn from(kind: &ExprKind) -> Self {
        match kind {
            ExprKind::Number(_) => Self::Number,
            ExprKind::Ident(_) => Self::Ident,
            ExprKind::Unary { .. } => Self::Unary,
            ExprKind::Binary { .. } => Self::Binary,
            ExprKind::Group { .. } => Self::Group,
        }
    }
}

/// Callback invoked for nodes whose tag matches; `S` is caller state threaded
/// through the walk.
pub type Handler<'a, S> = Box<dyn FnMut(&ExprArena, NodeId, &mut S) + 'a>;

/// Mapping from node-kind tags to handlers.
pub struct DispatchTable<'a, S> {
    handlers: FxHashMap<NodeKind, Handler<'a, S>>,
}

impl<S> Default for DispatchTable<'_, S> {
    fn default() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }
}

impl<'a, S> DispatchTable<'a, S> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, replacing any previous registration.
    pub fn on<F>(&mut self, kind: NodeKind, handler: F)
    where
        F: FnMut(&ExprArena, NodeId, &mut S) + 'a,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    fn dispatch(&mut self, arena: &ExprArena, id: NodeId, state: &mut S) {
        let kind = NodeKind::from(&arena.node(id).kind);
        if let Some(handler) = self.handlers.get_mut(&kind) {
            handler(arena, id, state);
        }
    }
}

/// Walks the subtree rooted at `root` depth-first in source order, dispatching
/// each node through `table`.
pub fn walk<S>(arena: &ExprArena, root: NodeId, table: &mut DispatchTable<'_, S>, state: &mut S) {
    table.dispatch(arena, root, state);
    match &arena.node(root).kind {
        ExprKind::Number(_) | ExprKind::Ident(_) => {}
        ExprKind::Unary { operand, .. } => walk(arena, *operand, table, state),
        ExprKind::Binary { left, right, .. } => {
            walk(arena, *left, table, state);
            if let Some(right) = right {
                walk(arena, *right, table, state);
            }
        }
        ExprKind::Group { inner } => walk(arena, *inner, table, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    #[test]
    fn test_walk_visits_every_binary_once_in_source_order() {
        let arena = parse_line("a > 1 && b > 2", 0).unwrap().unwrap();
        let mut table: DispatchTable<Vec<usize>> = DispatchTable::new();
        table.on(NodeKind::Binary, |arena, id, seen: &mut Vec<usize>| {
            seen.push(arena.node(id).span.start);
        });
        let mut seen = Vec::new();
        walk(&arena, arena.root().unwrap(), &mut table, &mut seen);
        // `&&` root first, then both comparisons left to right
        assert_eq!(seen, vec![0, 0, 9]);
    }

    #[test]
    fn test_unregistered_kinds_fall_through() {
        let arena = parse_line("-(x + 1)", 0).unwrap().unwrap();
        let mut table: DispatchTable<usize> = DispatchTable::new();
        table.on(NodeKind::Ident, |_, _, count: &mut usize| *count += 1);
        let mut count = 0;
        walk(&arena, arena.root().unwrap(), &mut table, &mut count);
        assert_eq!(count, 1);
    }
}
