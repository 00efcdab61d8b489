//! Locating the statement containing a document offset, and the handful of
//! structural queries editor features build on top of that.

use smithy_syntax::{Statement, StatementKind};

/// A view onto the statement (and, transitively, the enclosing block chain)
/// that contains a given offset in a parsed statement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementView {
    /// Index of the innermost statement at the queried offset, or `None` if
    /// the offset fell in a gap with no enclosing block to attribute it to.
    index: Option<usize>,
}

impl StatementView {
    /// Builds a view for `offset` into `statements` (the flat list produced
    /// by `parse_idl`).
    ///
    /// Binary-searches for the top-level statement containing `offset`; if
    /// that hit is a `Block`, descends into its member range to find the
    /// innermost non-block statement. Falls back to the nearest enclosing
    /// block when `offset` sits in a gap between members.
    pub fn at(statements: &[Statement], offset: usize) -> Self {
        if statements.is_empty() {
            return Self { index: None };
        }
        Self { index: resolve(statements, 0, statements.len() - 1, None, offset) }
    }

    /// The statement index this view resolved to, if any.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn statement<'a>(&self, statements: &'a [Statement]) -> Option<&'a Statement> {
        self.index.and_then(|i| statements.get(i))
    }

    /// Walks backward from this view until a `ShapeDef` is found.
    pub fn nearest_shape_def_before<'a>(&self, statements: &'a [Statement]) -> Option<&'a Statement> {
        let start = self.index?;
        statements[..=start].iter().rev().find(|s| matches!(s.kind, StatementKind::ShapeDef { .. }))
    }

    /// Walks forward skipping only `TraitApplication`s until a `ShapeDef` is
    /// found; any other intervening statement breaks the search.
    pub fn nearest_shape_def_after<'a>(&self, statements: &'a [Statement]) -> Option<&'a Statement> {
        let start = self.index?;
        for stmt in &statements[start..] {
            match &stmt.kind {
                StatementKind::ShapeDef { .. } => return Some(stmt),
                StatementKind::TraitApplication { .. } => continue,
                _ => return None,
            }
        }
        None
    }

    /// Finds the enclosing block of this view, then collects any
    /// `ForResource`/`Mixins` statements sitting immediately before it.
    pub fn nearest_for_resource_and_mixins_before<'a>(
        &self,
        statements: &'a [Statement],
    ) -> (Option<&'a Statement>, Option<&'a Statement>) {
        let Some(block_idx) = self.enclosing_block_index(statements) else {
            return (None, None);
        };
        let mut for_resource = None;
        let mut mixins = None;
        let mut i = block_idx;
        while i > 0 {
            i -= 1;
            match &statements[i].kind {
                StatementKind::ForResource { .. } if for_resource.is_none() => for_resource = Some(&statements[i]),
                StatementKind::Mixins { .. } if mixins.is_none() => mixins = Some(&statements[i]),
                StatementKind::ShapeDef { .. } => break,
                _ => break,
            }
            if for_resource.is_some() && mixins.is_some() {
                break;
            }
        }
        (for_resource, mixins)
    }

    /// Names of sibling member definitions in this view's enclosing block,
    /// excluding the view's own statement.
    pub fn other_member_names(&self, statements: &[Statement]) -> Vec<String> {
        let Some(view_idx) = self.index else { return Vec::new() };
        let Some(block_idx) = self.enclosing_block_index(statements) else { return Vec::new() };
        let StatementKind::Block { last_statement_index, .. } = statements[block_idx].kind else {
            return Vec::new();
        };
        statements[block_idx + 1..=last_statement_index.min(statements.len() - 1)]
            .iter()
            .enumerate()
            .filter(|(i, s)| block_idx + 1 + i != view_idx && s.parent == Some(block_idx))
            .filter_map(|(_, s)| member_name(&s.kind))
            .collect()
    }

    fn enclosing_block_index(&self, statements: &[Statement]) -> Option<usize> {
        let idx = self.index?;
        if statements[idx].is_block() {
            return Some(idx);
        }
        statements[idx].parent
    }
}

fn member_name(kind: &StatementKind) -> Option<String> {
    match kind {
        StatementKind::MemberDef { name, .. }
        | StatementKind::EnumMemberDef { name, .. }
        | StatementKind::ElidedMemberDef { name }
        | StatementKind::InlineMemberDef { name }
        | StatementKind::NodeMemberDef { name, .. } => Some(name.clone()),
        _ => None,
    }
}

/// Collects the indices of direct children in `[first, last_inclusive]`,
/// skipping over a `Block` child's own members (they live one level deeper).
fn direct_children(statements: &[Statement], first: usize, last_inclusive: usize) -> Vec<usize> {
    let mut children = Vec::new();
    let mut i = first;
    while i <= last_inclusive {
        children.push(i);
        i = match statements[i].kind {
            StatementKind::Block { last_statement_index, .. } => last_statement_index + 1,
            _ => i + 1,
        };
    }
    children
}

/// Binary search over a sibling list (non-overlapping spans) for the one
/// containing `offset`.
fn binary_search_siblings(statements: &[Statement], siblings: &[usize], offset: usize) -> Option<usize> {
    let mut lo = 0usize;
    let mut hi = siblings.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let idx = siblings[mid];
        let s = &statements[idx];
        if offset < s.start() {
            hi = mid;
        } else if offset >= s.end() {
            lo = mid + 1;
        } else {
            return Some(idx);
        }
    }
    None
}

/// Resolves `offset` within the statement range `[first, last_inclusive]`,
/// recursing into a `Block` hit to find the innermost containing statement.
/// `enclosing_block` is the index of the block this range is the member list
/// of (`None` at the top level); it is the fallback when `offset` sits in a
/// gap between siblings, since every gap inside a block still belongs to
/// that block.
fn resolve(
    statements: &[Statement],
    first: usize,
    last_inclusive: usize,
    enclosing_block: Option<usize>,
    offset: usize,
) -> Option<usize> {
    let siblings = direct_children(statements, first, last_inclusive);
    match binary_search_siblings(statements, &siblings, offset) {
        Some(idx) => match statements[idx].kind {
            StatementKind::Block { last_statement_index, .. } if last_statement_index > idx => {
                resolve(statements, idx + 1, last_statement_index, Some(idx), offset).or(Some(idx))
            }
            _ => Some(idx),
        },
        None => enclosing_block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smithy_parser::parse_idl;
    use smithy_position::Document;

    #[test]
    fn finds_member_inside_block() {
        let doc = Document::of("structure Foo {\n    bar: String\n}\n").unwrap();
        let result = parse_idl(&doc);
        let member_offset = result
            .statements
            .iter()
            .position(|s| matches!(s.kind, StatementKind::MemberDef { .. }))
            .map(|i| result.statements[i].start() + 1)
            .unwrap();
        let view = StatementView::at(&result.statements, member_offset);
        let stmt = view.statement(&result.statements).unwrap();
        assert!(matches!(stmt.kind, StatementKind::MemberDef { .. }));
    }

    #[test]
    fn nearest_shape_def_after_skips_trait_applications() {
        let doc = Document::of("@foo\n@bar\nstructure Foo {}\n").unwrap();
        let result = parse_idl(&doc);
        let first_trait_offset = result.statements[0].start();
        let view = StatementView::at(&result.statements, first_trait_offset);
        let shape_def = view.nearest_shape_def_after(&result.statements).unwrap();
        assert!(matches!(&shape_def.kind, StatementKind::ShapeDef { name, .. } if name == "Foo"));
    }

    #[test]
    fn other_member_names_excludes_self() {
        let doc = Document::of("structure Foo {\n    a: String\n    b: String\n}\n").unwrap();
        let result = parse_idl(&doc);
        let a_offset = result
            .statements
            .iter()
            .find(|s| matches!(&s.kind, StatementKind::MemberDef{ name, .. } if name == "a"))
            .map(|s| s.start() + 1)
            .unwrap();
        let view = StatementView::at(&result.statements, a_offset);
        let others = view.other_member_names(&result.statements);
        assert_eq!(others, vec!["b".to_string()]);
    }
}
