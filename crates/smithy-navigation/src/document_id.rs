//! Shape-id token extraction at a cursor position.

use serde::{Deserialize, Serialize};
use smithy_position::{Document, Position};

/// The lexical shape of an extracted id token, inferred purely from its
/// punctuation (`.`, `#`, `$`) — not from whether it resolves to anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentIdKind {
    /// Bareword, no `.`/`#`/`$`.
    Id,
    /// Contains `.` but no `#` or `$`.
    Namespace,
    /// Contains `#`, no `$` after it.
    AbsoluteId,
    /// Contains `$`, no `#`.
    RelativeWithMember,
    /// Contains both `#` and a later `$`.
    AbsoluteWithMember,
}

impl DocumentIdKind {
    /// Whether this id names a member (`Foo$bar`, `com.foo#Foo$bar`) rather
    /// than a shape itself — drives whether a feature handler should search
    /// shapes or members.
    pub fn is_member(&self) -> bool {
        matches!(self, DocumentIdKind::RelativeWithMember | DocumentIdKind::AbsoluteWithMember)
    }

    fn classify(text: &str) -> Self {
        match (text.contains('#'), text.contains('$'), text.contains('.')) {
            (true, true, _) => DocumentIdKind::AbsoluteWithMember,
            (true, false, _) => DocumentIdKind::AbsoluteId,
            (false, true, _) => DocumentIdKind::RelativeWithMember,
            (false, false, true) => DocumentIdKind::Namespace,
            (false, false, false) => DocumentIdKind::Id,
        }
    }
}

/// An identifier token extracted at a cursor position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentId {
    pub value: String,
    pub kind: DocumentIdKind,
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '#' | '$')
}

/// Extracts the `DocumentId` touching `position`, or `None` if the position
/// sits in whitespace/structure rather than on an id token.
///
/// Scans left and right from the position over the id character class. A
/// position sitting strictly between two id tokens (in whitespace) returns
/// `None`; a position at the boundary of an id (anchored to one of its
/// characters) returns that id.
pub fn document_id_at(document: &Document, position: Position) -> Option<DocumentId> {
    let offset = document.index_of_position(position)?;
    let text = document.copy_text();
    document_id_at_offset(&text, offset)
}

fn document_id_at_offset(text: &str, offset: usize) -> Option<DocumentId> {
    let bytes = text.as_bytes();
    if offset > bytes.len() {
        return None;
    }

    let touches_left = offset > 0 && is_id_char(text[..offset].chars().next_back()?);
    let touches_right = offset < bytes.len() && is_id_char(text[offset..].chars().next()?);
    if !touches_left && !touches_right {
        return None;
    }

    let mut start = offset;
    while start > 0 {
        let prev = text[..start].chars().next_back()?;
        if !is_id_char(prev) {
            break;
        }
        start -= prev.len_utf8();
    }
    let mut end = offset;
    while end < bytes.len() {
        let next = text[end..].chars().next()?;
        if !is_id_char(next) {
            break;
        }
        end += next.len_utf8();
    }
    if start == end {
        return None;
    }

    let value = text[start..end].to_string();
    let kind = DocumentIdKind::classify(&value);
    Some(DocumentId { value, kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use smithy_position::Document;

    #[test]
    fn absolute_id_resolves_from_either_half() {
        let doc = Document::of("use com.foo#Bar").unwrap();
        let on_bar = document_id_at(&doc, Position::new(0, 13)).unwrap();
        assert_eq!(on_bar.value, "com.foo#Bar");
        assert_eq!(on_bar.kind, DocumentIdKind::AbsoluteId);

        let on_namespace = document_id_at(&doc, Position::new(0, 6)).unwrap();
        assert_eq!(on_namespace.value, "com.foo#Bar");
        assert_eq!(on_namespace.kind, DocumentIdKind::AbsoluteId);
    }

    #[test]
    fn whitespace_between_ids_yields_none() {
        let doc = Document::of("use com.foo#Bar").unwrap();
        assert!(document_id_at(&doc, Position::new(0, 3)).is_none());
    }

    #[test]
    fn member_id_is_detected() {
        let doc = Document::of("Foo$bar").unwrap();
        let id = document_id_at(&doc, Position::new(0, 1)).unwrap();
        assert_eq!(id.kind, DocumentIdKind::RelativeWithMember);
        assert!(id.kind.is_member());
    }
}
