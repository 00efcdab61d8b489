//! Flat IDL statement stream produced by `parse_idl`.

use crate::node::Node;
use serde::{Deserialize, Serialize};
use smithy_position::Span;
use std::sync::Arc;

/// One entry in the flat statement list. Statements are never nested inside
/// one another structurally — a block's members sit alongside it in the same
/// `Vec`, linked by [`Statement::parent`] and [`StatementKind::Block`]'s
/// index bookkeeping. This keeps the tree acyclic and index-based rather than
/// pointer-based, so it derives `Clone`/`Serialize` for free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
    /// Index into the owning statement list of the nearest enclosing
    /// `Block`, or `None` at the top level.
    pub parent: Option<usize>,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span, parent: Option<usize>) -> Self {
        Self { kind, span, parent }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, StatementKind::Block { .. })
    }

    pub fn is_err(&self) -> bool {
        matches!(self.kind, StatementKind::Err { .. })
    }
}

/// Discriminated payload for [`Statement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// A statement the parser gave up on before recognizing any keyword —
    /// bookkeeping only, carries no data beyond its span.
    Incomplete,

    /// `$key: value` control statement (e.g. `$version`).
    Control { key: String, value: Option<Node> },

    /// `metadata key = value`.
    Metadata { key: String, value: Option<Node> },

    /// `namespace com.example`.
    Namespace { name: String },

    /// `use com.example#Shape`.
    Use { id: String },

    /// `apply ShapeId` — the following trait application(s) are separate
    /// sibling statements (a lone [`StatementKind::TraitApplication`] or a
    /// [`StatementKind::Block`] of them).
    Apply { target: String },

    /// The opening line of a shape definition: `structure Foo`,
    /// `string MyString`, `operation Op`, etc.
    ShapeDef { shape_type: String, name: String },

    /// `for ResourceShape` on a mixin/resource-bound shape.
    ForResource { resource: String },

    /// `with [A, B]` mixins list.
    Mixins { names: Vec<String> },

    /// `@trait` or `@trait(value)`, applied to the following statement.
    TraitApplication { name: String, value: Option<Node> },

    /// `name: Target = default` member of a structure-like shape.
    MemberDef {
        name: String,
        target: String,
        default_value: Option<Node>,
    },

    /// `NAME = value` or bare `NAME` member of an `enum`/`intEnum`.
    EnumMemberDef { name: String, value: Option<Node> },

    /// `$name` elided member, inheriting its target from a mixin.
    ElidedMemberDef { name: String },

    /// `name :=` shorthand introducing an inline structure body, used for
    /// operation `input`/`output`. The body itself is a following
    /// [`StatementKind::Block`] of `MemberDef`s.
    InlineMemberDef { name: String },

    /// `name: value` member of a node-valued shape (resource identifiers,
    /// service `version`, etc.) rather than a type reference.
    NodeMemberDef { name: String, value: Option<Node> },

    /// The `{`...`}` body belonging to the preceding statement.
    Block {
        /// This statement's own index in the flat list — redundant with its
        /// position but kept for callers holding a `&Statement` without the
        /// enclosing `Vec`.
        statement_index: usize,
        /// Index of the last statement enclosed by this block (inclusive).
        last_statement_index: usize,
    },

    /// A span the parser could not assign to any other statement kind.
    Err { message: Arc<str> },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(a: usize, b: usize) -> Span {
        Span::new(a, b)
    }

    #[test]
    fn block_carries_its_own_index_and_last_member() {
        let block = Statement::new(
            StatementKind::Block { statement_index: 2, last_statement_index: 5 },
            span(10, 40),
            None,
        );
        assert!(block.is_block());
        match block.kind {
            StatementKind::Block { statement_index, last_statement_index } => {
                assert_eq!(statement_index, 2);
                assert_eq!(last_statement_index, 5);
            }
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn member_statement_points_at_enclosing_block() {
        let member = Statement::new(
            StatementKind::MemberDef { name: "id".into(), target: "String".into(), default_value: None },
            span(12, 22),
            Some(2),
        );
        assert_eq!(member.parent, Some(2));
        assert!(!member.is_block());
    }

    #[test]
    fn err_statement_message_is_independent_of_node_errors() {
        let stmt = Statement::new(StatementKind::Err { message: Arc::from("unexpected token") }, span(0, 1), None);
        assert!(stmt.is_err());
    }
}
