//! Walking a parsed node value down to the leaf touching a document offset.

use smithy_syntax::{Kvp, Node, NodeKind};

/// One step on the path from a node's root to the leaf at a queried offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edge {
    /// Entered an `Obj`'s wrapped `Kvps`.
    Obj,
    /// Landed inside a `Kvp`'s key.
    Key(String),
    /// Descending into a `Kvp`'s value, named by its key (when the key
    /// parsed to text) or by its index within the `Kvps` otherwise.
    ValueForKey(String),
    /// Entered an `Arr`.
    Arr,
    /// Descending into an array element by index.
    Elem(usize),
    /// The walk ended here; no further descent was possible.
    Terminal,
}

/// A path from a node's root down to the innermost node touching an offset,
/// built once at construction and then walked back and forth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCursor {
    path: Vec<Edge>,
    position: usize,
    checkpoint: usize,
}

impl NodeCursor {
    /// Walks `root` to build the path to `offset`. If `offset` doesn't touch
    /// the node at all, the path is just `[Terminal]` at the root.
    pub fn new(root: &Node, offset: usize) -> Self {
        let mut path = Vec::new();
        walk(root, offset, &mut path);
        path.push(Edge::Terminal);
        Self { path, position: 0, checkpoint: 0 }
    }

    pub fn path(&self) -> &[Edge] {
        &self.path
    }

    /// The edge at the cursor's current position.
    pub fn current(&self) -> &Edge {
        &self.path[self.position]
    }

    /// Advances the cursor and returns the new current edge, or `None` if
    /// already at the end of the path.
    pub fn next(&mut self) -> Option<&Edge> {
        if self.position + 1 < self.path.len() {
            self.position += 1;
            Some(&self.path[self.position])
        } else {
            None
        }
    }

    /// Retreats the cursor and returns the new current edge, or `None` if
    /// already at the start of the path.
    pub fn previous(&mut self) -> Option<&Edge> {
        if self.position > 0 {
            self.position -= 1;
            Some(&self.path[self.position])
        } else {
            None
        }
    }

    /// Remembers the current position for a later `return_to_checkpoint`.
    pub fn set_checkpoint(&mut self) {
        self.checkpoint = self.position;
    }

    /// Jumps back to the last `set_checkpoint` position (or the start, if
    /// none was ever set).
    pub fn return_to_checkpoint(&mut self) {
        self.position = self.checkpoint;
    }
}

fn walk(node: &Node, offset: usize, path: &mut Vec<Edge>) {
    if !node.span.contains_inclusive(offset) {
        return;
    }
    match &node.kind {
        NodeKind::Obj(kvps) => {
            path.push(Edge::Obj);
            walk_kvps(kvps, offset, path);
        }
        NodeKind::Kvps(members) => {
            // A bare Kvps at the root (the naked-trait-value production has
            // no surrounding Obj) still reads as "entered an object" from a
            // cursor's point of view.
            path.push(Edge::Obj);
            walk_kvps_members(members, offset, path);
        }
        NodeKind::Arr(elements) => {
            path.push(Edge::Arr);
            walk_array(elements, offset, path);
        }
        _ => {}
    }
}

fn walk_kvps(kvps_node: &Node, offset: usize, path: &mut Vec<Edge>) {
    if let NodeKind::Kvps(members) = &kvps_node.kind {
        walk_kvps_members(members, offset, path);
    }
}

fn walk_kvps_members(members: &[Node], offset: usize, path: &mut Vec<Edge>) {
    for member in members {
        let NodeKind::Kvp(kvp) = &member.kind else { continue };
        if member.span.contains_inclusive(offset) {
            descend_into_kvp(kvp, offset, path);
            return;
        }
    }
    // Past every member but still inside the Kvps span: a trailing edit.
    // Attribute it to the last member's value, per the "in-progress typing"
    // case — there's nothing more specific to offer.
    if let Some(last) = members.last() {
        if let NodeKind::Kvp(kvp) = &last.kind {
            descend_into_kvp(kvp, offset, path);
        }
    }
}

fn descend_into_kvp(kvp: &Kvp, offset: usize, path: &mut Vec<Edge>) {
    let key_name = kvp.key.as_text().map(str::to_string).unwrap_or_default();
    if kvp.key.span.contains_inclusive(offset) {
        path.push(Edge::Key(key_name));
        return;
    }
    path.push(Edge::ValueForKey(key_name));
    if let Some(value) = &kvp.value {
        walk(value, offset, path);
    }
}

fn walk_array(elements: &[Node], offset: usize, path: &mut Vec<Edge>) {
    for (i, elem) in elements.iter().enumerate() {
        if elem.span.contains_inclusive(offset) {
            path.push(Edge::Elem(i));
            walk(elem, offset, path);
            return;
        }
    }
    if let Some((i, last)) = elements.iter().enumerate().last() {
        path.push(Edge::Elem(i));
        walk(last, offset, path);
    }
}
