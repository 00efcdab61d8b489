//! The mutable, line-indexed text buffer all other components read from.

use crate::error::DocumentError;
use crate::line_index::LineStarts;
use crate::position::{Position, Range};
use ropey::{Rope, RopeSlice};
use tracing::instrument;

/// A mutable text buffer with a maintained line-start table.
///
/// `Document` is the only mutable shared state this core touches: parse
/// results and navigation views are immutable snapshots taken at some
/// point in the document's history, and must be recomputed after an edit.
#[derive(Debug, Clone)]
pub struct Document {
    rope: Rope,
    lines: LineStarts,
}

impl Document {
    /// Constructs a document from initial text, building the line table.
    pub fn of(text: impl AsRef<str>) -> Result<Self, DocumentError> {
        let rope = Rope::from_str(text.as_ref());
        let lines = LineStarts::from_rope(&rope);
        Ok(Self { rope, lines })
    }

    /// Number of logical lines in the document (including a trailing empty
    /// line if the text ends with a terminator).
    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Total length of the document text in bytes.
    pub fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Offset of line `n`'s first character, or `None` if `n` is out of range.
    pub fn index_of_line(&self, n: i64) -> Option<usize> {
        if n < 0 {
            return None;
        }
        self.lines.line_start(n as usize)
    }

    /// Offset one past the content of line `n` (where its terminator, if
    /// any, begins), or `None` if `n` is out of range.
    fn content_end_of_line(&self, n: usize) -> Option<usize> {
        if n >= self.lines.line_count() {
            return None;
        }
        Some(self.lines.line_content_end(n, &self.rope, self.rope.len_bytes()))
    }

    /// Absolute offset for `position`, or `None` if `position.character` is
    /// past the end of its line (strictly more than the line's UTF-16
    /// length). `character == line length` is valid and yields the offset of
    /// the line's terminator (or of the end of text, for the last line).
    pub fn index_of_position(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let line_start = self.lines.line_start(line)?;
        let content_end = self.content_end_of_line(line)?;
        if position.character == 0 {
            return Some(line_start);
        }
        let slice = self.rope.byte_slice(line_start..content_end);
        let mut units = 0u32;
        let mut byte_off = 0usize;
        for ch in slice.chars() {
            if units >= position.character {
                break;
            }
            units += ch.len_utf16() as u32;
            byte_off += ch.len_utf8();
        }
        if units < position.character {
            return None;
        }
        Some(line_start + byte_off)
    }

    /// Inverse of [`Document::index_of_position`]. Returns `None` for
    /// offsets beyond the last real character (i.e. `> len()`).
    pub fn position_at_index(&self, offset: usize) -> Option<Position> {
        if offset > self.rope.len_bytes() {
            return None;
        }
        let line = self.lines.line_of_offset(offset);
        let line_start = self.lines.line_start(line)?;
        let slice = self.rope.byte_slice(line_start..offset.max(line_start));
        let character = slice.chars().map(|c| c.len_utf16() as u32).sum();
        Some(Position::new(line as u32, character))
    }

    /// Binary search for the line containing `offset`.
    pub fn line_of_index(&self, offset: usize) -> usize {
        self.lines.line_of_offset(offset)
    }

    /// An owned copy of the full document text.
    pub fn copy_text(&self) -> String {
        self.rope.to_string()
    }

    /// An owned copy of `[start, end)`.
    pub fn copy_span(&self, start: usize, end: usize) -> String {
        self.rope.byte_slice(start..end).to_string()
    }

    /// A borrowed view over the full document text. Must not be held across
    /// the next call to [`Document::apply_edit`] — the borrow checker
    /// enforces this since `apply_edit` takes `&mut self`.
    pub fn borrow_text(&self) -> RopeSlice<'_> {
        self.rope.byte_slice(..)
    }

    /// A borrowed view over `[start, end)`. See [`Document::borrow_text`].
    pub fn borrow_span(&self, start: usize, end: usize) -> RopeSlice<'_> {
        self.rope.byte_slice(start..end)
    }

    /// Byte offset of the first occurrence of `needle` at or after `from`,
    /// or `None` if not found.
    pub fn next_index_of(&self, needle: &str, from: usize) -> Option<usize> {
        if needle.is_empty() || from > self.rope.len_bytes() {
            return None;
        }
        let text = self.rope.byte_slice(from..).to_string();
        text.find(needle).map(|rel| from + rel)
    }

    /// Byte offset of the last occurrence of `needle` at or before `from`,
    /// or `None` if not found.
    pub fn last_index_of(&self, needle: &str, from: usize) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let bound = from.min(self.rope.len_bytes());
        let text = self.rope.byte_slice(..bound).to_string();
        text.rfind(needle)
    }

    /// Replaces `[range.start, range.end)` with `new_text`, then rebuilds the
    /// line table. Invalid ranges (`start > end`, or an endpoint outside the
    /// text) leave the document unchanged and return
    /// [`DocumentError::InvalidRange`].
    #[instrument(level = "debug", skip(self, new_text), fields(len = new_text.len()))]
    pub fn apply_edit(&mut self, range: Range, new_text: &str) -> Result<(), DocumentError> {
        let invalid = || DocumentError::InvalidRange {
            start: (range.start.line, range.start.character),
            end: (range.end.line, range.end.character),
        };
        let start = self.index_of_position(range.start).ok_or_else(invalid)?;
        let end = self.index_of_position(range.end).ok_or_else(invalid)?;
        if start > end {
            return Err(invalid());
        }

        let start_char = self.rope.byte_to_char(start);
        let end_char = self.rope.byte_to_char(end);
        self.rope.remove(start_char..end_char);
        if !new_text.is_empty() {
            self.rope.insert(start_char, new_text);
        }
        self.lines = LineStarts::from_rope(&self.rope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_builds_line_table() {
        let doc = Document::of("abc\ndef\nghi").expect("valid text");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.index_of_line(0), Some(0));
        assert_eq!(doc.index_of_line(1), Some(4));
        assert_eq!(doc.index_of_line(2), Some(8));
        assert_eq!(doc.index_of_line(3), None);
    }

    #[test]
    fn trailing_terminator_adds_empty_line() {
        let doc = Document::of("abc\n").expect("valid text");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.index_of_line(1), Some(4));
        assert_eq!(doc.index_of_line(2), None);
    }

    #[test]
    fn position_round_trip() {
        let doc = Document::of("hello\nworld\n¡Ñ!").expect("valid text");
        for offset in 0..=doc.len() {
            if let Some(pos) = doc.position_at_index(offset) {
                assert_eq!(doc.index_of_position(pos), Some(offset), "offset {offset}");
            }
        }
    }

    #[test]
    fn character_past_end_of_line_is_invalid() {
        let doc = Document::of("abc\ndef").expect("valid text");
        // "abc" is 3 UTF-16 units long; character 3 is valid (the terminator), 4 is not.
        assert_eq!(doc.index_of_position(Position::new(0, 3)), Some(3));
        assert_eq!(doc.index_of_position(Position::new(0, 4)), None);
    }

    #[test]
    fn crlf_is_one_terminator() {
        let doc = Document::of("a\r\nb").expect("valid text");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.index_of_line(1), Some(3));
    }

    #[test]
    fn apply_edit_replaces_range() {
        let mut doc = Document::of("abc\ndef").expect("valid text");
        doc.apply_edit(Range::new(Position::new(1, 3), Position::new(1, 3)), "g")
            .expect("edit applies");
        assert_eq!(doc.copy_text(), "abc\ndefg");
        assert_eq!(doc.index_of_line(1), Some(4));
    }

    #[test]
    fn apply_edit_across_lines() {
        let mut doc = Document::of("Line 1\nLine 2\nLine 3").expect("valid text");
        doc.apply_edit(Range::new(Position::new(0, 5), Position::new(2, 4)), "A\nB\nC")
            .expect("edit applies");
        assert_eq!(doc.copy_text(), "Line A\nB\nC 3");
    }

    #[test]
    fn apply_edit_invalid_range_leaves_document_unchanged() {
        let mut doc = Document::of("abc").expect("valid text");
        let before = doc.copy_text();
        let result = doc.apply_edit(Range::new(Position::new(5, 0), Position::new(5, 0)), "x");
        assert!(result.is_err());
        assert_eq!(doc.copy_text(), before);
    }

    #[test]
    fn apply_edit_start_after_end_is_rejected() {
        let mut doc = Document::of("abcdef").expect("valid text");
        let result = doc.apply_edit(Range::new(Position::new(0, 4), Position::new(0, 1)), "x");
        assert!(result.is_err());
    }

    #[test]
    fn edit_round_trip_is_invertible() {
        let mut doc = Document::of("hello world").expect("valid text");
        let original = doc.copy_text();
        doc.apply_edit(Range::new(Position::new(0, 6), Position::new(0, 11)), "Rust")
            .expect("edit applies");
        assert_eq!(doc.copy_text(), "hello Rust");
        doc.apply_edit(Range::new(Position::new(0, 6), Position::new(0, 10)), "world")
            .expect("edit applies");
        assert_eq!(doc.copy_text(), original);
    }

    #[test]
    fn next_and_last_index_of() {
        let doc = Document::of("foo bar foo baz").expect("valid text");
        assert_eq!(doc.next_index_of("foo", 1), Some(8));
        assert_eq!(doc.last_index_of("foo", doc.len()), Some(8));
        assert_eq!(doc.next_index_of("qux", 0), None);
    }

    #[test]
    fn utf16_emoji_position() {
        let doc = Document::of("Hello 🌍 world").expect("valid text");
        // "Hello " = 6 units, emoji = 2 units -> "world" starts at UTF-16 col 9.
        let pos = Position::new(0, 9);
        let offset = doc.index_of_position(pos).expect("offset exists");
        assert_eq!(doc.copy_span(offset, offset + 5), "world");
    }
}
