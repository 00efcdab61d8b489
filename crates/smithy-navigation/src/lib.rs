//! Navigation primitives built on top of a Smithy parse result: locating the
//! statement and node at a document offset, extracting the id token under a
//! cursor, and detecting a file's preamble without running the full parser.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod document_id;
mod model_loader;
mod node_cursor;
mod preamble;
mod statement_view;

pub use document_id::{document_id_at, DocumentId, DocumentIdKind};
pub use model_loader::ModelLoader;
pub use node_cursor::{Edge, NodeCursor};
pub use preamble::{preamble, Preamble, PreambleItem};
pub use statement_view::StatementView;

use smithy_parser::IdlParseResult;

/// Locates the statement containing `offset` in `parse_result`. The sole
/// consumer-facing entry point into [`StatementView`] construction — feature
/// handlers reach the statement tree only through this function and the
/// parse result it's given.
pub fn view_at(parse_result: &IdlParseResult, offset: usize) -> Option<StatementView> {
    let view = StatementView::at(&parse_result.statements, offset);
    view.index().map(|_| view)
}
