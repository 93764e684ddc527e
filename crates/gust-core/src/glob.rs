//! Match-driven traversal orchestration.
//!
//! [`glob`] compiles a pattern and drives the [`gust_walk`] tree walker from
//! the pattern's static root, pruning subtrees that cannot contain matches
//! and collecting every path the anchored predicate accepts. [`is_match`]
//! reuses the same compiled predicate against a single candidate with no
//! traversal at all.
//!
//! The walker invokes the callback from multiple rayon workers, so the
//! result set is the one piece of shared state and sits behind a mutex
//! scoped to the call. A traversal I/O error aborts the call; an error
//! return means "no matches are valid", never a partial set.

use std::fs;
use std::path::Path;

use parking_lot::Mutex;

use gust_walk::{walk, EntryKind, FlowControl};

use crate::error::{GustError, Result};
use crate::pathutil::to_slash;
use crate::pattern::{GlobPattern, MatchPlan};

/// Resolve `pattern` against the filesystem, returning every matching path.
///
/// Symlinks may match as leaves but are never descended into. Paths are
/// reported with `/` separators, absolute when the pattern is absolute and
/// relative to the working directory otherwise. The order of the returned
/// set is unspecified.
pub fn glob(pattern: &str) -> Result<Vec<String>> {
    glob_with(pattern, false)
}

/// Like [`glob`], but a symlink whose target is a directory is traversed
/// through as that directory.
pub fn glob_follow_symlinks(pattern: &str) -> Result<Vec<String>> {
    glob_with(pattern, true)
}

/// Evaluate `pattern` against a single candidate path. Pure: compiles the
/// pattern and matches the string, touching the filesystem only for the
/// compile-time environment lookups.
pub fn is_match(pattern: &str, name: &str) -> Result<bool> {
    Ok(GlobPattern::compile(pattern)?.matches(name))
}

fn glob_with(pattern: &str, follow_symlinks: bool) -> Result<Vec<String>> {
    let compiled = GlobPattern::compile(pattern)?;

    let MatchPlan::Walk {
        root,
        dir_mask,
        matcher,
    } = compiled.plan()
    else {
        // Wildcard-free pattern: degrade to an existence check.
        return if Path::new(pattern).exists() {
            Ok(vec![pattern.to_string()])
        } else {
            Err(GustError::not_found(pattern))
        };
    };

    tracing::debug!(pattern, %root, %dir_mask, "compiled glob");

    let relative = !Path::new(pattern).is_absolute();
    let matches = Mutex::new(Vec::new());

    walk(Path::new(root), |entry, kind| {
        let mut path = entry.to_string_lossy().into_owned();
        // Report names relative to the search start when rooted at `.`.
        if root == "." && root.len() < path.len() {
            path = path[root.len() + 1..].to_string();
        }
        let path = to_slash(&path);

        if follow_symlinks && kind == EntryKind::Symlink {
            if let Ok(meta) = fs::metadata(entry) {
                if meta.is_dir() {
                    return FlowControl::FollowSymlink;
                }
            }
        }

        if kind == EntryKind::Dir {
            // The traversal root itself is never a match.
            if path == "." || path.len() <= root.len() {
                return FlowControl::Continue;
            }
            if matcher.is_match(&path) {
                // A matching directory is recorded and still descended
                // into: it may contain further matches.
                matches.lock().push(path);
                return FlowControl::Continue;
            }
            // Too short to reach the wildcard region and not on the way
            // there: nothing below can match.
            if path.len() < dir_mask.len() && !dir_mask.starts_with(&format!("{path}/")) {
                return FlowControl::SkipSubtree;
            }
            return FlowControl::Continue;
        }

        if matcher.is_match(&path) {
            let mut path = path;
            if relative && path.starts_with('/') {
                path = path[root.len() + 1..].to_string();
            }
            matches.lock().push(path);
        }
        FlowControl::Continue
    })?;

    let matches = matches.into_inner();
    tracing::debug!(pattern, count = matches.len(), "glob finished");
    Ok(matches)
}
