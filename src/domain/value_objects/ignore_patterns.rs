//! Filter patterns value object
//!
//! User-configured include/exclude patterns for the production filter, using
//! gitignore semantics relative to the project root.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fmt;
use std::path::Path;

/// Maximum number of patterns allowed per list
const MAX_PATTERNS: usize = 1000;

/// A compiled list of gitignore-style patterns.
///
/// Uses the `ignore` crate for gitignore-compatible pattern matching.
#[derive(Debug, Clone)]
pub struct PatternSet {
    matcher: Gitignore,
    patterns: Vec<String>,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PatternSet {
    /// Create an empty pattern set (matches nothing).
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
            patterns: Vec::new(),
        }
    }

    /// Compile patterns. Blank lines and `#` comments are skipped.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let mut builder = GitignoreBuilder::new("");
        let mut kept = Vec::new();

        for pattern in patterns {
            let trimmed = pattern.as_ref().trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            kept.push(trimmed.to_string());
            if kept.len() > MAX_PATTERNS {
                return Err(PatternError::TooManyPatterns {
                    count: kept.len(),
                    limit: MAX_PATTERNS,
                });
            }

            builder
                .add_line(None, trimmed)
                .map_err(|e| PatternError::InvalidPattern {
                    pattern: trimmed.to_string(),
                    message: e.to_string(),
                })?;
        }

        let matcher = builder
            .build()
            .map_err(|e| PatternError::BuildFailed(e.to_string()))?;

        Ok(Self {
            matcher,
            patterns: kept,
        })
    }

    /// Return the pattern that matches `rel_path` (or one of its parent
    /// directories), if any. Negated (`!`) patterns un-match.
    pub fn matching_pattern(&self, rel_path: &str) -> Option<&str> {
        let matched = self
            .matcher
            .matched_path_or_any_parents(Path::new(rel_path), false);
        if matched.is_ignore() {
            matched.inner().map(|glob| glob.original())
        } else {
            None
        }
    }

    pub fn is_match(&self, rel_path: &str) -> bool {
        self.matching_pattern(rel_path).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Errors compiling a pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Too many patterns in one list.
    TooManyPatterns { count: usize, limit: usize },
    /// A pattern has invalid syntax.
    InvalidPattern { pattern: String, message: String },
    /// Failed to build the gitignore matcher.
    BuildFailed(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyPatterns { count, limit } => {
                write!(f, "{} patterns exceed the limit of {}", count, limit)
            }
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid pattern '{}': {}", pattern, message)
            }
            Self::BuildFailed(message) => write!(f, "failed to build matcher: {}", message),
        }
    }
}

impl std::error::Error for PatternError {}
