//! The frozen diagnostic taxonomy produced by the Smithy IDL parser.
//!
//! Errors from this core are data, not control flow: every parse produces an
//! `errors` list alongside its (possibly partial) result, and the parser
//! never aborts because of one. [`ErrorKind`]'s `Display` strings are part of
//! that contract — callers match on message prefixes to drive diagnostic
//! mapping, so the wording here must not drift.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

use serde::{Deserialize, Serialize};
use smithy_position::Span;
use thiserror::Error;

/// One diagnostic produced during a parse, with the span it covers.
///
/// Every error item has a non-empty span except at exact insertion points
/// (e.g. an `expected }` reported at end-of-file), where a zero-width span
/// is allowed.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{kind} at {span}")]
pub struct SyntaxError {
    pub span: Span,
    pub kind: ErrorKind,
}

impl SyntaxError {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { span, kind }
    }

    /// The stable message text, independent of span — the part callers
    /// pattern-match on.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// The frozen set of diagnostic messages this parser can emit.
///
/// Grouped per the taxonomy the parser is specified against: structural
/// (missing delimiters), token-shape, lexical, and semantic-at-parse.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ErrorKind {
    // -- structural --
    #[error("expected {{")]
    ExpectedOpenBrace,
    #[error("expected }}")]
    ExpectedCloseBrace,
    #[error("expected ]")]
    ExpectedCloseBracket,
    #[error("missing ]")]
    MissingCloseBracket,
    #[error("missing }}")]
    MissingCloseBrace,

    // -- token-shape --
    #[error("expected identifier")]
    ExpectedIdentifier,
    #[error("expected :")]
    ExpectedColon,
    #[error("expected =")]
    ExpectedEquals,
    #[error("expected value")]
    ExpectedValue,
    #[error("expected node")]
    ExpectedNode,

    // -- lexical --
    #[error("unclosed string literal")]
    UnclosedStringLiteral,
    #[error("unclosed text block")]
    UnclosedTextBlock,
    #[error("unexpected token {lexeme}")]
    UnexpectedToken { lexeme: String },
    #[error("unexpected eof")]
    UnexpectedEof,
    /// Raised when a `Kvp` key is neither a string nor an identifier; `found`
    /// names the node kind encountered instead.
    #[error("unexpected {found}")]
    UnexpectedKeyType { found: String },

    // -- semantic-at-parse --
    #[error("{literal} is not a valid number")]
    InvalidNumber { literal: String },
}

/// An ordered collection of [`SyntaxError`]s collected during one parse.
///
/// Duplicate errors at the same position are permitted by design (the
/// parser may independently notice the same problem while recovering twice)
/// and are preserved rather than deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics(Vec<SyntaxError>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: SyntaxError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SyntaxError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<SyntaxError> {
        self.0
    }

    /// A copy of the diagnostics sorted by span start, stable on ties so
    /// duplicate-position errors keep the order they were recorded in.
    pub fn sorted_by_position(&self) -> Vec<SyntaxError> {
        let mut sorted = self.0.clone();
        sorted.sort_by_key(|e| e.span.start);
        sorted
    }
}

impl IntoIterator for Diagnostics {
    type Item = SyntaxError;
    type IntoIter = std::vec::IntoIter<SyntaxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Extend<SyntaxError> for Diagnostics {
    fn extend<T: IntoIterator<Item = SyntaxError>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl FromIterator<SyntaxError> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = SyntaxError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(a: usize, b: usize) -> Span {
        Span::new(a, b)
    }

    #[test]
    fn messages_match_the_frozen_taxonomy() {
        assert_eq!(ErrorKind::ExpectedOpenBrace.to_string(), "expected {");
        assert_eq!(ErrorKind::ExpectedCloseBrace.to_string(), "expected }");
        assert_eq!(ErrorKind::ExpectedColon.to_string(), "expected :");
        assert_eq!(ErrorKind::ExpectedValue.to_string(), "expected value");
        assert_eq!(
            ErrorKind::UnexpectedToken { lexeme: "@".into() }.to_string(),
            "unexpected token @"
        );
        assert_eq!(
            ErrorKind::InvalidNumber { literal: "1.2.3".into() }.to_string(),
            "1.2.3 is not a valid number"
        );
    }

    #[test]
    fn diagnostics_preserve_duplicate_positions() {
        let mut diags = Diagnostics::new();
        diags.push(SyntaxError::new(ErrorKind::ExpectedColon, span(4, 4)));
        diags.push(SyntaxError::new(ErrorKind::ExpectedValue, span(4, 4)));
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.sorted_by_position().len(), 2);
    }

    #[test]
    fn sorted_by_position_is_stable() {
        let mut diags = Diagnostics::new();
        diags.push(SyntaxError::new(ErrorKind::ExpectedCloseBrace, span(10, 10)));
        diags.push(SyntaxError::new(ErrorKind::ExpectedIdentifier, span(2, 3)));
        let sorted = diags.sorted_by_position();
        assert_eq!(sorted[0].kind, ErrorKind::ExpectedIdentifier);
        assert_eq!(sorted[1].kind, ErrorKind::ExpectedCloseBrace);
    }
}
