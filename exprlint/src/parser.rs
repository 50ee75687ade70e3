//! Lexer and parser for expression files.
//!
//! One expression per line; `#` starts a comment that runs to end of line.
//! The parser is deliberately tolerant of one malformed shape: a binary
//! operator with nothing after it (`a > `) still produces a binary node, with
//! an absent right operand, so downstream analysis sees the operator tag.

use crate::ast::{BinaryOp, ExprArena, ExprKind, NodeId, Span, UnaryOp};
use thiserror::Error;

/// Failure while lexing or parsing a single line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character outside the expression alphabet.
    #[error("unexpected character `{ch}`")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Absolute byte offset of the character.
        offset: usize,
    },
    /// A well-formed token in a position where it cannot start or continue an
    /// expression.
    #[error("unexpected token `{token}`")]
    UnexpectedToken {
        /// Lexeme of the offending token.
        token: String,
        /// Absolute byte offset of the token.
        offset: usize,
    },
    /// An opening parenthesis without a matching close.
    #[error("unclosed parenthesis")]
    UnclosedParen {
        /// Absolute byte offset of the `(`.
        offset: usize,
    },
    /// An operand was required but the input ended.
    #[error("expected an operand")]
    MissingOperand {
        /// Absolute byte offset where the operand was expected.
        offset: usize,
    },
}

impl ParseError {
    /// Absolute byte offset the error points at.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnexpectedChar { offset, .. }
            | Self::UnexpectedToken { offset, .. }
            | Self::UnclosedParen { offset }
            | Self::MissingOperand { offset } => *offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Number,
    Ident,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Bang,
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    span: Span,
    text: String,
}

/// Parses one line into an expression tree.
///
/// `offset` is the byte offset of the line within the whole file; all spans in
/// the returned arena are file-absolute. Returns `Ok(None)` for blank and
/// comment-only lines.
pub fn parse_line(line: &str, offset: usize) -> Result<Option<ExprArena>, ParseError> {
    let tokens = lex(line, offset)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let end_offset = offset + line.len();
    let mut parser = Parser {
        tokens,
        pos: 0,
        arena: ExprArena::new(),
        end_offset,
    };
    let root = parser.parse_expr(0)?;
    if let Some(stray) = parser.peek() {
        return Err(ParseError::UnexpectedToken {
            token: stray.text.clone(),
            offset: stray.span.start,
        });
    }
    parser.arena.set_root(root);
    Ok(Some(parser.arena))
}

fn lex(line: &str, offset: usize) -> Result<Vec<Token>, ParseError> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' => i += 1,
            b'#' => break,
            b'0'..=b'9' => {
                let start = i;
                let mut seen_dot = false;
                while i < bytes.len()
                    && (bytes[i].is_ascii_digit() || (bytes[i] == b'.' && !seen_dot))
                {
                    if bytes[i] == b'.' {
                        seen_dot = true;
                    }
                    i += 1;
                }
                tokens.push(token(TokenKind::Number, line, start, i, offset));
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push(token(TokenKind::Ident, line, start, i, offset));
            }
            b'+' => i = push_single(&mut tokens, TokenKind::Plus, line, i, offset),
            b'-' => i = push_single(&mut tokens, TokenKind::Minus, line, i, offset),
            b'*' => i = push_single(&mut tokens, TokenKind::Star, line, i, offset),
            b'/' => i = push_single(&mut tokens, TokenKind::Slash, line, i, offset),
            b'%' => i = push_single(&mut tokens, TokenKind::Percent, line, i, offset),
            b'(' => i = push_single(&mut tokens, TokenKind::LParen, line, i, offset),
            b')' => i = push_single(&mut tokens, TokenKind::RParen, line, i, offset),
            b'<' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(token(TokenKind::LtEq, line, i, i + 2, offset));
                    i += 2;
                } else {
                    i = push_single(&mut tokens, TokenKind::Lt, line, i, offset);
                }
            }
            b'>' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(token(TokenKind::GtEq, line, i, i + 2, offset));
                    i += 2;
                } else {
                    i = push_single(&mut tokens, TokenKind::Gt, line, i, offset);
                }
            }
            b'=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(token(TokenKind::EqEq, line, i, i + 2, offset));
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedChar {
                        ch: '=',
                        offset: offset + i,
                    });
                }
            }
            b'!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(token(TokenKind::NotEq, line, i, i + 2, offset));
                    i += 2;
                } else {
                    i = push_single(&mut tokens, TokenKind::Bang, line, i, offset);
                }
            }
            b'&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    tokens.push(token(TokenKind::AndAnd, line, i, i + 2, offset));
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedChar {
                        ch: '&',
                        offset: offset + i,
                    });
                }
            }
            b'|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    tokens.push(token(TokenKind::OrOr, line, i, i + 2, offset));
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedChar {
                        ch: '|',
                        offset: offset + i,
                    });
                }
            }
            _ => {
                let ch = line[i..].chars().next().unwrap_or('\u{fffd}');
                return Err(ParseError::UnexpectedChar {
                    ch,
                    offset: offset + i,
                });
            }
        }
    }
    Ok(tokens)
}

fn token(kind: TokenKind, line: &str, start: usize, end: usize, offset: usize) -> Token {
    Token {
        kind,
        span: Span::new(offset + start, offset + end),
        text: line[start..end].to_owned(),
    }
}

fn push_single(tokens: &mut Vec<Token>, kind: TokenKind, line: &str, i: usize, offset: usize) -> usize {
    tokens.push(token(kind, line, i, i + 1, offset));
    i + 1
}

const fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::OrOr => Some(BinaryOp::Or),
        TokenKind::AndAnd => Some(BinaryOp::And),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Rem),
        _ => None,
    }
}

// Prefix operators bind tighter than any binary operator.
const UNARY_PRECEDENCE: u8 = 6;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    arena: ExprArena,
    end_offset: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_prefix()?;
        while let Some(tok) = self.peek() {
            let Some(op) = binary_op(tok.kind) else {
                break;
            };
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            let op_span = tok.span;
            self.pos += 1;
            // A dangling operator at end of input still yields a binary node;
            // the missing operand is recorded as an absent right child.
            let rhs = if self.peek().is_none() {
                None
            } else {
                Some(self.parse_expr(precedence + 1)?)
            };
            let start = self.arena.node(lhs).span.start;
            let end = match rhs {
                Some(rhs) => self.arena.node(rhs).span.end,
                None => op_span.end,
            };
            let bin = self.arena.alloc(
                ExprKind::Binary {
                    op,
                    left: lhs,
                    right: rhs,
                },
                Span::new(start, end),
            );
            self.arena.set_parent(lhs, Some(bin));
            if let Some(rhs) = rhs {
                self.arena.set_parent(rhs, Some(bin));
            }
            lhs = bin;
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<NodeId, ParseError> {
        let Some(tok) = self.advance() else {
            return Err(ParseError::MissingOperand {
                offset: self.end_offset,
            });
        };
        match tok.kind {
            TokenKind::Number => Ok(self.arena.alloc(ExprKind::Number(tok.text), tok.span)),
            TokenKind::Ident => Ok(self.arena.alloc(ExprKind::Ident(tok.text), tok.span)),
            TokenKind::Minus | TokenKind::Bang => {
                let op = if tok.kind == TokenKind::Minus {
                    UnaryOp::Neg
                } else {
                    UnaryOp::Not
                };
                let operand = self.parse_expr(UNARY_PRECEDENCE)?;
                let span = Span::new(tok.span.start, self.arena.node(operand).span.end);
                let node = self.arena.alloc(ExprKind::Unary { op, operand }, span);
                self.arena.set_parent(operand, Some(node));
                Ok(node)
            }
            TokenKind::LParen => {
                let inner = self.parse_expr(0)?;
                let Some(close) = self.advance() else {
                    return Err(ParseError::UnclosedParen {
                        offset: tok.span.start,
                    });
                };
                if close.kind != TokenKind::RParen {
                    return Err(ParseError::UnexpectedToken {
                        token: close.text,
                        offset: close.span.start,
                    });
                }
                let span = Span::new(tok.span.start, close.span.end);
                let node = self.arena.alloc(ExprKind::Group { inner }, span);
                self.arena.set_parent(inner, Some(node));
                Ok(node)
            }
            _ => Err(ParseError::UnexpectedToken {
                token: tok.text,
                offset: tok.span.start,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ExprArena {
        parse_line(line, 0).unwrap().unwrap()
    }

    fn root_kind(arena: &ExprArena) -> &ExprKind {
        &arena.node(arena.root().unwrap()).kind
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert!(parse_line("", 0).unwrap().is_none());
        assert!(parse_line("   ", 0).unwrap().is_none());
        assert!(parse_line("# just a comment", 0).unwrap().is_none());
    }

    #[test]
    fn test_simple_comparison() {
        let arena = parse("x > 5");
        let ExprKind::Binary { op, left, right } = root_kind(&arena) else {
            panic!("expected binary root");
        };
        assert_eq!(*op, BinaryOp::Gt);
        assert_eq!(&arena.node(*left).kind, &ExprKind::Ident("x".to_owned()));
        let right = right.expect("right operand");
        assert_eq!(&arena.node(right).kind, &ExprKind::Number("5".to_owned()));
    }

    #[test]
    fn test_precedence_arithmetic_binds_tighter() {
        // a + b * c > d  parses as  (a + (b * c)) > d
        let arena = parse("a + b * c > d");
        let ExprKind::Binary { op, left, .. } = root_kind(&arena) else {
            panic!("expected binary root");
        };
        assert_eq!(*op, BinaryOp::Gt);
        let ExprKind::Binary { op: left_op, .. } = &arena.node(*left).kind else {
            panic!("expected binary left operand");
        };
        assert_eq!(*left_op, BinaryOp::Add);
    }

    #[test]
    fn test_logical_binds_loosest() {
        let arena = parse("a > 1 && b > 2");
        let ExprKind::Binary { op, .. } = root_kind(&arena) else {
            panic!("expected binary root");
        };
        assert_eq!(*op, BinaryOp::And);
    }

    #[test]
    fn test_dangling_operator_keeps_operator_tag() {
        let arena = parse("a > ");
        let ExprKind::Binary { op, right, .. } = root_kind(&arena) else {
            panic!("expected binary root");
        };
        assert_eq!(*op, BinaryOp::Gt);
        assert!(right.is_none());
    }

    #[test]
    fn test_dangling_operator_before_comment() {
        let arena = parse("a >  # unfinished");
        let ExprKind::Binary { op, right, .. } = root_kind(&arena) else {
            panic!("expected binary root");
        };
        assert_eq!(*op, BinaryOp::Gt);
        assert!(right.is_none());
    }

    #[test]
    fn test_group_and_unary() {
        let arena = parse("!(x > 5)");
        let ExprKind::Unary { op, operand } = root_kind(&arena) else {
            panic!("expected unary root");
        };
        assert_eq!(*op, UnaryOp::Not);
        assert!(matches!(
            arena.node(*operand).kind,
            ExprKind::Group { .. }
        ));
    }

    #[test]
    fn test_offsets_are_absolute() {
        let arena = parse_line("x > 5", 100).unwrap().unwrap();
        let root = arena.root().unwrap();
        assert_eq!(arena.node(root).span, Span::new(100, 105));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_line("a $ b", 0),
            Err(ParseError::UnexpectedChar { ch: '$', .. })
        ));
        assert!(matches!(
            parse_line("(a > b", 0),
            Err(ParseError::UnclosedParen { .. })
        ));
        assert!(matches!(
            parse_line("a b", 0),
            Err(ParseError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_line("a = b", 0),
            Err(ParseError::UnexpectedChar { ch: '=', .. })
        ));
    }
}
