//! Element path tracking and root-relative path resolution

use crate::config::ConfigError;

/// Separator between element names in a path
pub const PATH_SEPARATOR: char = '/';

/// Stack of the currently open element names, document root at the bottom
///
/// Depth always equals the current nesting depth: one push per element open, one pop per
/// element close. Names are qualified names compared as opaque strings.
#[derive(Debug, Clone, Default)]
pub struct PathStack {
    names: Vec<String>,
}

impl PathStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Join the open element names with `/`
    pub fn current_path(&self) -> String {
        self.names.join("/")
    }
}

/// Validated `/`-joined path of the record boundary element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPath {
    path: String,
}

impl RootPath {
    pub fn new(path: impl Into<String>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.is_empty() || path.split(PATH_SEPARATOR).any(str::is_empty) {
            return Err(ConfigError::InvalidRoot {
                root: path,
                reason: "path must be non-empty names joined by '/'".to_string(),
            });
        }
        Ok(Self { path })
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Check whether a path is exactly the root path
    pub fn is_root(&self, current_path: &str) -> bool {
        current_path == self.path
    }

    /// Resolve the part of `current_path` below the root
    ///
    /// Returns `None` outside the root and exactly at the root. The root must be followed by a
    /// separator, so `a/bc` is not below `a/b`.
    ///
    /// Behaviour change: a bare string-prefix test would put `a/bc` below root `a/b` with
    /// relative path `c`. Such paths are now treated as outside the root.
    pub fn relative_path<'a>(&self, current_path: &'a str) -> Option<&'a str> {
        current_path
            .strip_prefix(self.path.as_str())?
            .strip_prefix(PATH_SEPARATOR)
            .filter(|relative| !relative.is_empty())
    }
}

impl std::fmt::Display for RootPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_stack_push_pop() {
        let mut stack = PathStack::new();
        assert_eq!(stack.current_path(), "");
        stack.push("mediawiki");
        stack.push("page");
        stack.push("revision");
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.current_path(), "mediawiki/page/revision");
        assert_eq!(stack.pop().as_deref(), Some("revision"));
        assert_eq!(stack.current_path(), "mediawiki/page");
    }

    #[test]
    fn test_qualified_names_are_opaque() {
        let mut stack = PathStack::new();
        stack.push("ns:feed");
        stack.push("ns:entry");
        assert_eq!(stack.current_path(), "ns:feed/ns:entry");
    }

    #[test]
    fn test_relative_path_below_root() {
        let root = RootPath::new("a/b").unwrap();
        assert_eq!(root.relative_path("a/b/c/d"), Some("c/d"));
        assert_eq!(root.relative_path("a/b/c"), Some("c"));
    }

    #[test]
    fn test_relative_path_at_root_is_none() {
        let root = RootPath::new("a/b").unwrap();
        assert_eq!(root.relative_path("a/b"), None);
        assert!(root.is_root("a/b"));
    }

    #[test]
    fn test_relative_path_outside_root_is_none() {
        let root = RootPath::new("a/b").unwrap();
        assert_eq!(root.relative_path("x/y"), None);
        assert_eq!(root.relative_path("a"), None);
        assert_eq!(root.relative_path(""), None);
    }

    #[test]
    fn test_relative_path_requires_separator_boundary() {
        let root = RootPath::new("a/b").unwrap();
        assert_eq!(root.relative_path("a/bc"), None);
        assert_eq!(root.relative_path("a/bc/d"), None);
    }

    #[test]
    fn test_root_path_rejects_empty_segments() {
        assert!(RootPath::new("").is_err());
        assert!(RootPath::new("a//b").is_err());
        assert!(RootPath::new("/a").is_err());
        assert!(RootPath::new("page").is_ok());
    }
}
