//! Error types for Gust core operations.
//!
//! This module defines well-structured error types using `thiserror` for
//! library-level errors, while higher-level code can use `anyhow` for
//! convenient error handling.

use gust_walk::WalkError;
use thiserror::Error;

/// Result type alias using GustError
pub type Result<T> = std::result::Result<T, GustError>;

/// Core error types for Gust operations.
///
/// There is no partial-success mode: a `glob` call either returns a complete
/// match set or one of these errors, never both.
#[derive(Error, Debug)]
pub enum GustError {
    /// The glob pattern could not be compiled (bad character range,
    /// unterminated group, ...)
    #[error("invalid glob pattern: {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A literal, wildcard-free pattern named a path that does not exist
    #[error("file does not exist: {path}")]
    NotFound { path: String },

    /// I/O failure while descending the tree; aborts the whole call
    #[error("traversal failed: {0}")]
    Traversal(#[from] WalkError),
}

impl GustError {
    /// Create a pattern-compilation error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        GustError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-found error for a literal pattern
    pub fn not_found(path: impl Into<String>) -> Self {
        GustError::NotFound { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_the_offending_fragment() {
        let err = GustError::invalid_pattern("foo/b[z-c]*", "invalid character class range");
        assert!(err.to_string().contains("foo/b[z-c]*"));

        let err = GustError::not_found("doo");
        assert!(err.to_string().contains("does not exist"));
    }
}
