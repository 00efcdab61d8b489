//! Syntax tree types produced by the lenient Smithy IDL parser: a recursive
//! [`Node`] tree for JSON-like values, and a flat, index-linked [`Statement`]
//! list for the IDL's top-level grammar.
//!
//! Neither type borrows from the source text or from each other — both are
//! owned snapshots keyed by byte [`smithy_position::Span`], so they outlive
//! the `Document` they were parsed from.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod node;
mod statement;

pub use node::{ErrLit, Kvp, Node, NodeKind, NumLit, StrLit};
pub use statement::{Statement, StatementKind};
