//! Line-indexed mutable text [`Document`] with UTF-8/UTF-16 position
//! conversion, the sole piece of mutable shared state in the Smithy syntax
//! core.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod document;
mod error;
mod line_index;
mod position;
mod span;

pub use document::Document;
pub use error::DocumentError;
pub use line_index::{offset_to_utf16_line_col, utf16_line_col_to_offset};
pub use position::{Position, Range};
pub use span::Span;

pub use ropey::RopeSlice;
