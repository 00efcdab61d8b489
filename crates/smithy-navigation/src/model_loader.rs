//! The collaborator contract for semantic model loading.
//!
//! Building and validating a full semantic model — resolving shape ids
//! across files, checking trait constraints, applying mixins — is out of
//! scope for this crate; it lives in whatever component owns the build
//! configuration and file set. `ModelLoader` documents the shape of that
//! boundary so navigation features can be written against it without this
//! crate depending on a model implementation.

use smithy_position::Document;
use std::collections::HashMap;

/// Something that can turn a set of parsed documents into a validated
/// semantic model keyed by absolute shape id.
///
/// This crate never implements or calls this trait; it exists purely so
/// editor feature handlers built on top of [`crate::StatementView`] and
/// [`crate::NodeCursor`] have a stable seam to depend on instead of a
/// concrete model crate.
pub trait ModelLoader {
    /// The validated model type this loader produces.
    type Model;
    /// The error type raised when loading or validation fails.
    type Error;

    /// Loads and validates a model from `documents`, keyed by file path.
    fn load(&self, documents: &HashMap<String, Document>) -> Result<Self::Model, Self::Error>;
}
