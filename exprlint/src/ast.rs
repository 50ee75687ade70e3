//! Arena-backed expression tree.
//!
//! All nodes of one expression live in a flat [`ExprArena`] and are addressed
//! by [`NodeId`]. Each node records its parent index, so "replace this node in
//! its parent" is an index-slot overwrite rather than a pointer swap. Nodes
//! displaced by a rewrite stay allocated but become unreachable from the root.

use serde::Serialize;

/// Byte range into the analyzed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span for nodes built by a rewrite rather than read from source.
    #[must_use]
    pub const fn synthetic() -> Self {
        Self { start: 0, end: 0 }
    }

    /// True for spans that do not cover any source text.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.start == self.end
    }

    /// The source text this span covers.
    #[must_use]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Binary operator tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// `||`
    Or,
    /// `&&`
    And,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
}

impl BinaryOp {
    /// Source symbol for the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }

    /// Binding power; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq | Self::Eq | Self::NotEq => 3,
            Self::Add | Self::Sub => 4,
            Self::Mul | Self::Div | Self::Rem => 5,
        }
    }

    /// True for the six comparison operators.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq | Self::Eq | Self::NotEq
        )
    }
}

/// Unary operator tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `!`
    Not,
}

impl UnaryOp {
    /// Source symbol for the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

/// Expression node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Numeric literal, kept as its source lexeme.
    Number(String),
    /// Identifier reference.
    Ident(String),
    /// Prefix operator applied to one operand.
    Unary {
        /// Operator tag.
        op: UnaryOp,
        /// Operand node.
        operand: NodeId,
    },
    /// Operator applied to two operands. The right operand is absent when the
    /// source is malformed (a dangling operator at end of input).
    Binary {
        /// Operator tag.
        op: BinaryOp,
        /// Left operand node.
        left: NodeId,
        /// Right operand node, absent for incomplete expressions.
        right: Option<NodeId>,
    },
    /// Parenthesized sub-expression.
    Group {
        /// The wrapped node.
        inner: NodeId,
    },
}

/// Stable index of a node within its [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// Payload.
    pub kind: ExprKind,
    /// Parent index; `None` for the root (and for garbage left by rewrites).
    pub parent: Option<NodeId>,
    /// Source range, synthetic for nodes built by rewrites.
    pub span: Span,
}

/// Flat storage for one expression tree.
#[derive(Debug, Clone, Default)]
pub struct ExprArena {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl ExprArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node with no parent and returns its id.
    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            kind,
            parent: None,
            span,
        });
        id
    }

    /// Number of allocated nodes, including any rewrite garbage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no nodes have been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrows a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Iterates over all allocated node ids, in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..u32::try_from(self.nodes.len()).unwrap_or(u32::MAX)).map(NodeId)
    }

    /// The current root of the tree.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Marks `id` as the tree root.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
        self.nodes[id.index()].parent = None;
    }

    /// Records `parent` as the parent of `id`.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.index()].parent = parent;
    }

    /// Child ids of `id`, left to right.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.node(id).kind {
            ExprKind::Number(_) | ExprKind::Ident(_) => Vec::new(),
            ExprKind::Unary { operand, .. } => vec![*operand],
            ExprKind::Binary { left, right, .. } => {
                let mut children = vec![*left];
                if let Some(right) = right {
                    children.push(*right);
                }
                children
            }
            ExprKind::Group { inner } => vec![*inner],
        }
    }

    /// Overwrites the child slot of `parent` holding `old` with `new` and
    /// re-parents `new`. Returns false when `old` is not a child of `parent`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> bool {
        let replaced = match &mut self.nodes[parent.index()].kind {
            ExprKind::Unary { operand, .. } => {
                if *operand == old {
                    *operand = new;
                    true
                } else {
                    false
                }
            }
            ExprKind::Binary { left, right, .. } => {
                if *left == old {
                    *left = new;
                    true
                } else if *right == Some(old) {
                    *right = Some(new);
                    true
                } else {
                    false
                }
            }
            ExprKind::Group { inner } => {
                if *inner == old {
                    *inner = new;
                    true
                } else {
                    false
                }
            }
            ExprKind::Number(_) | ExprKind::Ident(_) => false,
        };
        if replaced {
            self.nodes[new.index()].parent = Some(parent);
        }
        replaced
    }

    /// Substitutes `new` for `old` in the tree position `old` occupies, either
    /// in the parent's child slot or as the root. The spans of all ancestors
    /// are invalidated so rendering reflects the rewritten subtree. Returns
    /// false when `old` is neither the root nor a child of its recorded
    /// parent.
    pub fn substitute(&mut self, old: NodeId, new: NodeId) -> bool {
        match self.node(old).parent {
            Some(parent) => {
                if self.replace_child(parent, old, new) {
                    self.invalidate_ancestors(new);
                    true
                } else {
                    false
                }
            }
            None => {
                if self.root == Some(old) {
                    self.root = Some(new);
                    self.nodes[new.index()].parent = None;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Whether `id` is still reachable from the root through consistent
    /// parent/child links. Nodes displaced by [`ExprArena::substitute`] report
    /// false.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        // parent links cannot be longer than the node count
        for _ in 0..=self.nodes.len() {
            match self.node(current).parent {
                None => return self.root == Some(current),
                Some(parent) => {
                    if !self.children(parent).contains(&current) {
                        return false;
                    }
                    current = parent;
                }
            }
        }
        false
    }

    /// Renders `id` back to source text. Nodes with a real span reproduce
    /// their original text verbatim; synthetic nodes are printed structurally,
    /// parenthesizing operands where flattening would regroup the expression.
    #[must_use]
    pub fn render(&self, id: NodeId, source: &str) -> String {
        let node = self.node(id);
        if !node.span.is_synthetic() {
            return node.span.slice(source).to_owned();
        }
        match &node.kind {
            ExprKind::Number(text) | ExprKind::Ident(text) => text.clone(),
            ExprKind::Unary { op, operand } => {
                format!("{}{}", op.symbol(), self.render(*operand, source))
            }
            ExprKind::Binary { op, left, right } => {
                let lhs = self.render_operand(*left, *op, source);
                match right {
                    Some(right) => {
                        let rhs = self.render_operand(*right, *op, source);
                        format!("{lhs} {} {rhs}", op.symbol())
                    }
                    None => format!("{lhs} {}", op.symbol()),
                }
            }
            ExprKind::Group { inner } => format!("({})", self.render(*inner, source)),
        }
    }

    fn render_operand(&self, id: NodeId, parent_op: BinaryOp, source: &str) -> String {
        let text = self.render(id, source);
        match &self.node(id).kind {
            // a nested operator binding no tighter than its parent needs
            // explicit grouping to read back with the same structure
            ExprKind::Binary { op, .. } if op.precedence() <= parent_op.precedence() => {
                format!("({text})")
            }
            _ => text,
        }
    }

    fn invalidate_ancestors(&mut self, id: NodeId) {
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            self.nodes[parent.index()].span = Span::synthetic();
            current = self.node(parent).parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(arena: &mut ExprArena, name: &str, start: usize) -> NodeId {
        arena.alloc(
            ExprKind::Ident(name.to_owned()),
            Span::new(start, start + name.len()),
        )
    }

    #[test]
    fn test_alloc_and_parent_links() {
        let mut arena = ExprArena::new();
        let a = leaf(&mut arena, "a", 0);
        let b = leaf(&mut arena, "b", 4);
        let bin = arena.alloc(
            ExprKind::Binary {
                op: BinaryOp::Gt,
                left: a,
                right: Some(b),
            },
            Span::new(0, 5),
        );
        arena.set_parent(a, Some(bin));
        arena.set_parent(b, Some(bin));
        arena.set_root(bin);

        assert_eq!(arena.children(bin), vec![a, b]);
        assert!(arena.is_attached(a));
        assert!(arena.is_attached(bin));
    }

    #[test]
    fn test_substitute_detaches_old_node() {
        let mut arena = ExprArena::new();
        let a = leaf(&mut arena, "a", 0);
        let b = leaf(&mut arena, "b", 4);
        let bin = arena.alloc(
            ExprKind::Binary {
                op: BinaryOp::Gt,
                left: a,
                right: Some(b),
            },
            Span::new(0, 5),
        );
        arena.set_parent(a, Some(bin));
        arena.set_parent(b, Some(bin));
        arena.set_root(bin);

        let replacement = leaf(&mut arena, "c", 0);
        assert!(arena.substitute(bin, replacement));
        assert_eq!(arena.root(), Some(replacement));
        assert!(!arena.is_attached(bin));
        assert!(arena.is_attached(replacement));
    }

    #[test]
    fn test_replace_child_rejects_non_child() {
        let mut arena = ExprArena::new();
        let a = leaf(&mut arena, "a", 0);
        let b = leaf(&mut arena, "b", 4);
        let c = leaf(&mut arena, "c", 8);
        let bin = arena.alloc(
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: a,
                right: Some(b),
            },
            Span::new(0, 9),
        );
        assert!(!arena.replace_child(bin, c, a));
        assert!(arena.replace_child(bin, b, c));
        assert_eq!(arena.node(c).parent, Some(bin));
    }

    #[test]
    fn test_render_prefers_source_spans() {
        let source = "x+1 > y";
        let mut arena = ExprArena::new();
        let left = arena.alloc(ExprKind::Ident("ignored".to_owned()), Span::new(0, 3));
        let right = arena.alloc(ExprKind::Ident("y".to_owned()), Span::new(6, 7));
        let bin = arena.alloc(
            ExprKind::Binary {
                op: BinaryOp::Gt,
                left,
                right: Some(right),
            },
            Span::new(0, 7),
        );
        arena.set_parent(left, Some(bin));
        arena.set_parent(right, Some(bin));
        arena.set_root(bin);

        // span text wins over the structural form
        assert_eq!(arena.render(left, source), "x+1");
        assert_eq!(arena.render(bin, source), "x+1 > y");
    }

    #[test]
    fn test_render_synthetic_parenthesizes_equal_precedence() {
        let source = "";
        let mut arena = ExprArena::new();
        let a = arena.alloc(ExprKind::Ident("a".to_owned()), Span::synthetic());
        let b = arena.alloc(ExprKind::Ident("b".to_owned()), Span::synthetic());
        let inner = arena.alloc(
            ExprKind::Binary {
                op: BinaryOp::Lt,
                left: a,
                right: Some(b),
            },
            Span::synthetic(),
        );
        let c = arena.alloc(ExprKind::Ident("c".to_owned()), Span::synthetic());
        let outer = arena.alloc(
            ExprKind::Binary {
                op: BinaryOp::Lt,
                left: c,
                right: Some(inner),
            },
            Span::synthetic(),
        );
        assert_eq!(arena.render(outer, source), "c < (a < b)");
    }
}
