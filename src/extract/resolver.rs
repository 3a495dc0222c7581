//! Matching open element paths against configured columns

use crate::models::{Column, Schema};

use super::path::RootPath;

/// Outcome of resolving one element path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// The element is outside the root or is the root itself
    NoRelativePath,
    /// The element is below the root but names no column, e.g. a container such as `revision`
    NoMatch,
    /// The element's root-relative path names this column
    Column(&'a Column),
}

/// Resolves element paths against a root path and schema
#[derive(Debug, Clone)]
pub struct MatchResolver {
    root: RootPath,
    schema: Schema,
}

impl MatchResolver {
    pub fn new(root: RootPath, schema: Schema) -> Self {
        Self { root, schema }
    }

    pub fn root(&self) -> &RootPath {
        &self.root
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn is_root(&self, current_path: &str) -> bool {
        self.root.is_root(current_path)
    }

    /// Resolve the current `/`-joined element path
    pub fn resolve(&self, current_path: &str) -> Resolution<'_> {
        match self.root.relative_path(current_path) {
            None => Resolution::NoRelativePath,
            Some(relative) => self
                .schema
                .lookup(relative)
                .map_or(Resolution::NoMatch, Resolution::Column),
        }
    }
}
