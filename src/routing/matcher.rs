//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive, byte-wise)
//! - Strip a matched prefix for rewriting routes
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Plain starts-with, not segment-aware: `/node` matches `/nodexyz`
//! - Empty prefix = always matches (wildcard, used by the default route)
//! - No regex to guarantee O(n) matching

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// A matcher that accepts every path.
    pub fn any() -> Self {
        Self::new("")
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` starts with the prefix.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Returns the remainder of `path` after the prefix, if it matches.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.prefix.as_str())
    }
}
