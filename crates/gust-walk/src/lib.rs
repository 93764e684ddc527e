//! Parallel directory-tree walker.
//!
//! This crate provides the traversal primitive the Gust matcher is built on:
//! [`walk`] visits every entry below a root exactly once and hands each one to
//! a caller-supplied callback together with a minimal file-type indicator.
//! The callback steers the walk through [`FlowControl`]:
//!
//! - [`FlowControl::SkipSubtree`] prunes a directory without descending,
//! - [`FlowControl::FollowSymlink`] descends through a symlink as if it were
//!   the directory it points at.
//!
//! ## Concurrency
//!
//! Each directory's children are processed on the rayon thread pool, so the
//! callback is invoked from multiple worker threads concurrently and must be
//! `Send + Sync`. The walk itself is synchronous: `walk` returns only after
//! the whole subtree has been visited or an I/O error aborted it.
//!
//! ## Symlink cycles
//!
//! When the callback follows symlinks, the walker canonicalizes each followed
//! target and refuses to re-enter a directory already on its own descent
//! chain. Mutually recursive links terminate, while several links pointing at
//! one target from different places in the tree are each descended.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;

/// Minimal file-type indicator passed to the visit callback.
///
/// Derived from `lstat`-style metadata: a symlink reports as
/// [`EntryKind::Symlink`] even when its target is a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Dir,
    /// Symbolic link (not followed when classifying)
    Symlink,
    /// Anything else (fifo, socket, device, ...)
    Other,
}

impl EntryKind {
    fn of(file_type: &fs::FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// Control signal returned by the visit callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    /// Keep walking; directories are descended into.
    Continue,
    /// Do not descend into this directory.
    SkipSubtree,
    /// This symlink points at a directory; traverse through it as one.
    FollowSymlink,
}

/// Errors surfaced by [`walk`].
///
/// Any I/O failure below the root aborts the whole walk; there is no
/// partial-success mode.
#[derive(Error, Debug)]
pub enum WalkError {
    /// Reading an entry or directory failed
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    fn io(path: &Path, source: io::Error) -> Self {
        WalkError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Walk the tree rooted at `root`, invoking `visit` for every entry.
///
/// The root itself is visited first; returning
/// [`FlowControl::SkipSubtree`] for it makes the walk a no-op. Children of a
/// directory are visited in no particular order and possibly concurrently.
///
/// Returns the first I/O error encountered, which aborts the traversal.
pub fn walk<F>(root: &Path, visit: F) -> Result<(), WalkError>
where
    F: Fn(&Path, EntryKind) -> FlowControl + Send + Sync,
{
    let meta = fs::symlink_metadata(root).map_err(|e| WalkError::io(root, e))?;
    let kind = EntryKind::of(&meta.file_type());

    let descend = match (kind, visit(root, kind)) {
        (_, FlowControl::SkipSubtree) => false,
        (EntryKind::Dir, _) => true,
        (_, FlowControl::FollowSymlink) => true,
        _ => false,
    };
    if !descend {
        return Ok(());
    }

    // Canonical ancestry of the current descent: the root plus every
    // directory entered through a symlink on the way down. A followed link
    // is a cycle only when its target is already on this chain.
    let mut chain = Vec::new();
    if let Ok(canon) = fs::canonicalize(root) {
        chain.push(canon);
    }

    walk_dir(root, &visit, &chain)
}

fn walk_dir<F>(dir: &Path, visit: &F, chain: &[PathBuf]) -> Result<(), WalkError>
where
    F: Fn(&Path, EntryKind) -> FlowControl + Send + Sync,
{
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| WalkError::io(dir, e))? {
        let entry = entry.map_err(|e| WalkError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| WalkError::io(&entry.path(), e))?;
        children.push((entry.path(), EntryKind::of(&file_type)));
    }

    children.into_par_iter().try_for_each(|(path, kind)| {
        let descend = match (kind, visit(&path, kind)) {
            (_, FlowControl::SkipSubtree) => false,
            (EntryKind::Dir, _) => true,
            (EntryKind::Symlink, FlowControl::FollowSymlink) => true,
            _ => false,
        };
        if !descend {
            return Ok(());
        }

        if kind == EntryKind::Symlink {
            return match fs::canonicalize(&path) {
                // Target is an ancestor of this very descent: a cycle.
                Ok(canon) if chain.contains(&canon) => Ok(()),
                Ok(canon) => {
                    let mut chain = chain.to_vec();
                    chain.push(canon);
                    walk_dir(&path, visit, &chain)
                }
                // Target vanished or is unresolvable; nothing to descend into.
                Err(_) => Ok(()),
            };
        }

        walk_dir(&path, visit, chain)
    })
}
