use crate::ast::{BinaryOp, ExprArena, ExprKind, NodeId};
use crate::rules::ids::RULE_ID_NUMBER_LINE;
use crate::rules::{Context, Finding, FixAction, Rule, RuleMetadata};
use crate::visitor::NodeKind;

/// Message attached to every number-line-order finding.
pub const NUMBER_LINE_MESSAGE: &str = "Not in number line order";

/// Display name of the associated quick fix.
pub const REVERSE_INEQUALITY: &str = "Reverse inequality";

/// Flags comparisons written against number-line order.
///
/// Only the strict `>` operator is reported; `>=` and every other operator
/// tag stay untouched. A flagged expression reads naturally once rewritten
/// with `<` (smaller value on the left), which is what the attached
/// "Reverse inequality" fix produces.
pub struct NumberLineOrderRule;

impl Rule for NumberLineOrderRule {
    fn name(&self) -> &'static str {
        "NumberLineOrderRule"
    }

    fn metadata(&self) -> RuleMetadata {
        RuleMetadata {
            id: RULE_ID_NUMBER_LINE,
            category: "order",
        }
    }

    fn kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Binary]
    }

    fn visit_expr(
        &mut self,
        arena: &ExprArena,
        node: NodeId,
        context: &Context,
    ) -> Option<Vec<Finding>> {
        // The operator tag alone decides; a missing right operand does not
        // prevent the report (the fix declines such nodes on its own).
        let ExprKind::Binary {
            op: BinaryOp::Gt, ..
        } = &arena.node(node).kind
        else {
            return None;
        };
        let (line, col) = context.line_index.line_col(arena.node(node).span.start);
        Some(vec![Finding {
            rule_id: RULE_ID_NUMBER_LINE.to_owned(),
            message: NUMBER_LINE_MESSAGE.to_owned(),
            file: context.filename.clone(),
            line,
            col,
            severity: "LOW".to_owned(),
            node: Some(node),
            fix: Some(FixAction {
                title: REVERSE_INEQUALITY.to_owned(),
            }),
        }])
    }
}
