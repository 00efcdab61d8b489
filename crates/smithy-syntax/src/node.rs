//! JSON-like value nodes produced by `parse_node`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smithy_position::Span;
use std::sync::Arc;

/// A single JSON-like syntax node: an object, array, scalar, key-value pair,
/// or an error placeholder. Every node carries the byte span it was parsed
/// from, even when that parse produced an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    /// `true` for nodes produced by error recovery rather than a successful parse.
    pub fn is_err(&self) -> bool {
        matches!(self.kind, NodeKind::Err(_))
    }

    /// The bareword/string text this node holds, if it is a `Str` or `Ident`.
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Str(s) | NodeKind::Ident(s) => Some(&s.value),
            _ => None,
        }
    }
}

/// Discriminated payload for [`Node`].
///
/// `Obj` and `Kvps` are distinct because a bare `Kvps` (no surrounding
/// braces) is also valid as the top-level value of a trait application — see
/// the "naked kvps" production in the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// `{` Kvps `}` — the child is always a node of kind `Kvps`.
    Obj(Box<Node>),
    /// An ordered sequence of `Kvp` nodes; each member is a node of kind `Kvp`.
    Kvps(Vec<Node>),
    /// A single `key: value` pair inside a `Kvps`.
    Kvp(Box<Kvp>),
    /// `[` Node (`,`? Node)* `]`.
    Arr(Vec<Node>),
    /// A quoted string or text block.
    Str(StrLit),
    /// A bareword identifier, including `true`/`false`/`null` and shape ids.
    /// A syntactic subtype of `Str` sharing its payload shape.
    Ident(StrLit),
    /// An arbitrary-precision decimal numeric literal.
    Num(NumLit),
    /// An unparseable span; the human-readable reason is recorded in the
    /// parse result's aggregated `errors` list, keyed by this node's span.
    Err(ErrLit),
}

/// Payload shared by `Str` and `Ident` nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrLit {
    /// The textual content: unescaped body for a quoted string or text
    /// block, or the raw bareword for an identifier.
    pub value: String,
    /// `true` if this was written as a `"""`-delimited text block.
    pub is_text_block: bool,
}

impl StrLit {
    pub fn quoted(value: impl Into<String>) -> Self {
        Self { value: value.into(), is_text_block: false }
    }

    pub fn text_block(value: impl Into<String>) -> Self {
        Self { value: value.into(), is_text_block: true }
    }
}

/// An arbitrary-precision decimal literal, plus the raw lexeme it was
/// parsed from (for precise re-rendering).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumLit {
    pub value: Decimal,
    pub raw: Arc<str>,
}

/// An error-node placeholder. `text` is the raw source slice the parser
/// could not interpret, kept for display purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrLit {
    pub text: Arc<str>,
}

/// A `key: value` member of a `Kvps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kvp {
    pub key: Node,
    /// Byte offset of the `:`, or `None` if it is missing (error recovery).
    pub colon_pos: Option<usize>,
    /// `None` when error recovery closed the pair without a value.
    pub value: Option<Node>,
}

impl Node {
    /// Convenience constructor for an `Obj` node wrapping a `Kvps` node.
    pub fn obj(kvps_span: Span, members: Vec<Node>, span: Span) -> Self {
        Node::new(NodeKind::Obj(Box::new(Node::new(NodeKind::Kvps(members), kvps_span))), span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(a: usize, b: usize) -> Span {
        Span::new(a, b)
    }

    #[test]
    fn ident_shares_str_payload_shape() {
        let ident = Node::new(NodeKind::Ident(StrLit::quoted("MyShape")), span(0, 7));
        assert_eq!(ident.as_text(), Some("MyShape"));
        assert!(!ident.is_err());
    }

    #[test]
    fn obj_wraps_kvps_node() {
        let key = Node::new(NodeKind::Str(StrLit::quoted("a")), span(1, 4));
        let value = Node::new(NodeKind::Num(NumLit { value: Decimal::from(1), raw: Arc::from("1") }), span(6, 7));
        let kvp = Node::new(
            NodeKind::Kvp(Box::new(Kvp { key, colon_pos: Some(4), value: Some(value) })),
            span(1, 7),
        );
        let obj = Node::obj(span(0, 8), vec![kvp], span(0, 8));
        match obj.kind {
            NodeKind::Obj(inner) => match inner.kind {
                NodeKind::Kvps(members) => assert_eq!(members.len(), 1),
                other => panic!("expected Kvps, got {other:?}"),
            },
            other => panic!("expected Obj, got {other:?}"),
        }
    }

    #[test]
    fn err_node_carries_raw_text_not_message() {
        let err = Node::new(NodeKind::Err(ErrLit { text: Arc::from("???") }), span(0, 3));
        assert!(err.is_err());
        assert_eq!(err.as_text(), None);
    }
}
