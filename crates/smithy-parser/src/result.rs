//! Entry-point result types for the two parser grammars.

use smithy_error::Diagnostics;
use smithy_syntax::{Node, Statement};

/// Output of [`crate::parse_node`].
#[derive(Debug, Clone)]
pub struct NodeParseResult {
    pub value: Node,
    pub errors: Diagnostics,
}

/// Output of [`crate::parse_idl`].
///
/// `version`, `namespace`, and `imports` are convenience projections of the
/// same data also available by walking `statements` — kept here because
/// they're needed on essentially every parse (preamble rendering,
/// auto-import) and recomputing them is a cheap single pass done once.
#[derive(Debug, Clone)]
pub struct IdlParseResult {
    pub statements: Vec<Statement>,
    pub errors: Diagnostics,
    pub version: Option<String>,
    pub namespace: Option<String>,
    pub imports: Vec<String>,
}
