//! Line-start offset table and UTF-8/UTF-16 conversion helpers.

use ropey::Rope;

/// A sorted table of byte offsets, one per line start.
///
/// Invariants: `starts[0] == 0`; entries are strictly increasing; entries
/// recognize `\n`, `\r`, and `\r\n` uniformly as a single line terminator.
/// The final entry is the start of the text's last line; if the text ends
/// with a terminator, that last line is the empty line following it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineStarts {
    starts: Vec<usize>,
}

impl LineStarts {
    pub(crate) fn from_rope(rope: &Rope) -> Self {
        let mut starts = vec![0usize];
        let mut byte = 0usize;
        let mut chars = rope.chars().peekable();
        while let Some(ch) = chars.next() {
            byte += ch.len_utf8();
            match ch {
                '\n' => starts.push(byte),
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        let lf = chars.next().unwrap_or('\n');
                        byte += lf.len_utf8();
                    }
                    starts.push(byte);
                }
                _ => {}
            }
        }
        Self { starts }
    }

    pub(crate) fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Byte offset of the first character of `line`, or `None` if out of range.
    pub(crate) fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    /// Byte offset one past the end of `line`'s content, i.e. where its
    /// terminator (if any) begins. `text_len` is the full document length.
    pub(crate) fn line_content_end(&self, line: usize, rope: &Rope, text_len: usize) -> usize {
        let next_start = self.starts.get(line + 1).copied().unwrap_or(text_len);
        if next_start == text_len && self.starts.get(line + 1).is_none() {
            // Last line: no terminator to strip.
            return next_start;
        }
        // Strip a trailing \r\n, \n, or \r from [line_start, next_start).
        let line_start = self.starts[line];
        if next_start < 2 || next_start <= line_start {
            return next_start;
        }
        let last = rope.byte_slice(next_start.saturating_sub(1)..next_start).to_string();
        if last == "\n" {
            let maybe_cr_start = next_start.saturating_sub(2);
            if maybe_cr_start >= line_start
                && rope.byte_slice(maybe_cr_start..maybe_cr_start + 1).to_string() == "\r"
            {
                return maybe_cr_start;
            }
            return next_start - 1;
        }
        if last == "\r" {
            return next_start - 1;
        }
        next_start
    }

    /// Binary search for the line containing `offset`.
    pub(crate) fn line_of_offset(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }
}

/// Converts a byte offset to a (line, UTF-16 character) pair, independent of
/// any cached line table. Useful for one-off conversions and tests.
pub fn offset_to_utf16_line_col(text: &str, offset: usize) -> (u32, u32) {
    if offset >= text.len() {
        let mut line = 0u32;
        let mut col = 0u32;
        let mut acc = 0usize;
        for l in text.split_inclusive('\n') {
            acc += l.len();
            if acc >= text.len() {
                let stripped = l.strip_suffix('\n').unwrap_or(l);
                let stripped = stripped.strip_suffix('\r').unwrap_or(stripped);
                col = stripped.encode_utf16().count() as u32;
                break;
            }
            line += 1;
        }
        if text.ends_with('\n') || text.ends_with('\r') {
            return (text.split_inclusive('\n').count() as u32, 0);
        }
        return (line, col);
    }
    let mut acc = 0usize;
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let next = acc + line.len();
        if offset < next {
            let rel = offset - acc;
            let clamped = if line.is_char_boundary(rel) {
                rel
            } else {
                let mut c = rel;
                while c > 0 && !line.is_char_boundary(c) {
                    c -= 1;
                }
                c
            };
            return (idx as u32, line[..clamped].encode_utf16().count() as u32);
        }
        acc = next;
    }
    (0, 0)
}

/// Inverse of [`offset_to_utf16_line_col`].
pub fn utf16_line_col_to_offset(text: &str, line: u32, character: u32) -> usize {
    let mut offset = 0usize;
    for (idx, l) in text.split_inclusive('\n').enumerate() {
        if idx as u32 == line {
            if character == 0 {
                return offset;
            }
            let mut units = 0u32;
            for (byte_idx, ch) in l.char_indices() {
                if units >= character {
                    return offset + byte_idx;
                }
                units += ch.len_utf16() as u32;
            }
            let content_len =
                l.strip_suffix("\r\n").or_else(|| l.strip_suffix('\n')).unwrap_or(l).len();
            return offset + content_len.min(l.len());
        }
        offset += l.len();
    }
    text.len()
}
