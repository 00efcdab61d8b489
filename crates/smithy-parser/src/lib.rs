//! A lenient, single-pass, recursive-descent parser for Smithy IDL text and
//! its embedded JSON-like node grammar.
//!
//! Two entry points, both total: they never panic and always return a
//! (possibly partial) result plus whatever diagnostics were raised along the
//! way. There is no separate tokenizer — [`scanner::Scanner`] reads `char`s
//! directly off the source text and each grammar decides what it's looking
//! at one lookahead character at a time.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod idl_parser;
mod node_parser;
mod result;
mod scanner;

use smithy_error::Diagnostics;
use smithy_position::Document;
use tracing::instrument;

pub use result::{IdlParseResult, NodeParseResult};

/// Parses `document`'s text as a single free-standing JSON-like node: the
/// grammar used for trait arguments, member defaults, and metadata/node
/// values, but entered directly rather than embedded in IDL. Commas between
/// object members and array elements are significant here, unlike in
/// [`parse_idl`].
#[instrument(level = "debug", skip(document), fields(len = document.len()))]
pub fn parse_node(document: &Document) -> NodeParseResult {
    let text = document.copy_text();
    let mut scanner = scanner::Scanner::new(&text);
    let mut errors = Diagnostics::new();
    let value = node_parser::parse_value(&mut scanner, &mut errors, true);
    tracing::debug!(errors = errors.len(), "parse_node finished");
    NodeParseResult { value, errors }
}

/// Parses `document`'s text as Smithy IDL source, producing the flat
/// statement list described by [`smithy_syntax::Statement`] plus any
/// diagnostics raised during recovery.
#[instrument(level = "debug", skip(document), fields(len = document.len()))]
pub fn parse_idl(document: &Document) -> IdlParseResult {
    let text = document.copy_text();
    let result = idl_parser::parse(&text);
    tracing::debug!(statements = result.statements.len(), errors = result.errors.len(), "parse_idl finished");
    result
}
