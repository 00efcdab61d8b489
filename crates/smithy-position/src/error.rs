//! Operational (non-parse) errors for [`crate::Document`].
//!
//! These are ordinary `Result<T, E>` failures at the API boundary — distinct
//! from the parser's `errors: Vec<SyntaxError>`, which represent a parse that
//! *succeeded* in producing a recovered, partial result.

use thiserror::Error;

/// Failure modes for [`crate::Document`] construction and editing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// `applyEdit` was given a range that doesn't fit the current text:
    /// `start > end`, or an endpoint outside the document.
    #[error("invalid edit range: start {start:?} end {end:?}")]
    InvalidRange {
        start: (u32, u32),
        end: (u32, u32),
    },

    /// `of` was given text containing encoding errors. Unreachable from any
    /// safe Rust caller passing a `&str`/`String`; kept for API symmetry with
    /// fallible construction sites such as reading a file from disk.
    #[error("document text is not valid UTF-8")]
    InvalidText,
}
