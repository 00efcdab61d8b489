//! LSP-shaped `Position`/`Range` types, in zero-based line/UTF-16-character units.

use serde::{Deserialize, Serialize};

/// A zero-based (line, character) position, `character` counted in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open `[start, end)` range of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub const fn empty(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }
}

#[cfg(feature = "lsp-compat")]
mod lsp_compat {
    use super::{Position, Range};

    impl From<Position> for lsp_types::Position {
        fn from(p: Position) -> Self {
            lsp_types::Position::new(p.line, p.character)
        }
    }

    impl From<lsp_types::Position> for Position {
        fn from(p: lsp_types::Position) -> Self {
            Position::new(p.line, p.character)
        }
    }

    impl From<Range> for lsp_types::Range {
        fn from(r: Range) -> Self {
            lsp_types::Range::new(r.start.into(), r.end.into())
        }
    }

    impl From<lsp_types::Range> for Range {
        fn from(r: lsp_types::Range) -> Self {
            Range::new(r.start.into(), r.end.into())
        }
    }
}
