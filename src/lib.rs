//! Facade over the editor-resilient syntax layer for a Smithy IDL language
//! server: a line-aware [`Document`], a lenient single-pass parser, and the
//! navigation primitives editor features query at a character offset.
//!
//! This crate re-exports the consumer-facing surface described by its
//! member crates; it adds nothing of its own beyond wiring them together.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

pub use smithy_error::{Diagnostics, ErrorKind, SyntaxError};
pub use smithy_navigation::{
    document_id_at, preamble, view_at, DocumentId, DocumentIdKind, Edge, ModelLoader, NodeCursor,
    Preamble, PreambleItem, StatementView,
};
pub use smithy_parser::{parse_idl, parse_node, IdlParseResult, NodeParseResult};
pub use smithy_position::{
    offset_to_utf16_line_col, utf16_line_col_to_offset, Document, DocumentError, Position, Range, Span,
};
pub use smithy_syntax::{ErrLit, Kvp, Node, NodeKind, NumLit, Statement, StatementKind, StrLit};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_navigates_through_the_facade() {
        let doc = Document::of("namespace com.foo\n\nstructure Foo {\n    bar: String\n}\n").unwrap();
        let result = parse_idl(&doc);
        assert!(result.errors.is_empty());

        let offset = doc.copy_text().find("bar").unwrap();
        let view = view_at(&result, offset).unwrap();
        assert!(matches!(view.statement(&result.statements).unwrap().kind, StatementKind::MemberDef { .. }));

        let pre = preamble(&doc);
        assert_eq!(pre.namespace.map(|n| n.value), Some("com.foo".to_string()));
    }
}
