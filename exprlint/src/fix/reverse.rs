//! The "Reverse inequality" rewrite.

use crate::ast::{BinaryOp, ExprArena, ExprKind, NodeId, Span};

/// Rewrites a flagged `a > b` node into `b < a`, in place.
///
/// Builds a fresh `a < b` template in the arena, moves the original right
/// operand into the template's left slot and the original left operand into
/// its right slot (each move re-parents the operand; a node has exactly one
/// parent), then substitutes the template into the tree position the original
/// node occupied. The displaced node stays in the arena, detached.
///
/// Returns the replacement node, or `None` when the rewrite does not run:
/// the node is not a strict greater-than comparison, its right operand is
/// absent (syntactically incomplete expression), or the node is no longer
/// attached to its tree. All three are silently absorbed; a stale reference
/// is treated the same way as a malformed expression.
pub fn reverse_inequality(arena: &mut ExprArena, node: NodeId) -> Option<NodeId> {
    if !arena.is_attached(node) {
        return None;
    }
    let (left, right) = match &arena.node(node).kind {
        ExprKind::Binary {
            op: BinaryOp::Gt,
            left,
            right,
        } => match right {
            Some(right) => (*left, *right),
            None => return None,
        },
        _ => return None,
    };

    // Fresh `a < b` template. Both placeholder slots are structurally
    // present, so the moves below always have a slot to land in.
    let placeholder_left = arena.alloc(ExprKind::Ident("a".to_owned()), Span::synthetic());
    let placeholder_right = arena.alloc(ExprKind::Ident("b".to_owned()), Span::synthetic());
    let template = arena.alloc(
        ExprKind::Binary {
            op: BinaryOp::Lt,
            left: placeholder_left,
            right: Some(placeholder_right),
        },
        Span::synthetic(),
    );
    arena.set_parent(placeholder_left, Some(template));
    arena.set_parent(placeholder_right, Some(template));

    // Move the original operands in, right operand first.
    arena.replace_child(template, placeholder_left, right);
    arena.replace_child(template, placeholder_right, left);

    arena.substitute(node, template);
    Some(template)
}
