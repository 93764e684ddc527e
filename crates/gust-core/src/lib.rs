//! # Gust Core Library
//!
//! Extended shell-glob matching over real directory trees. Patterns support
//! `*`, segment-spanning `**/`, brace alternation `{a,b}`, character classes
//! `[a-z]`, negation groups `!(x)`, backslash escapes, and compile-time
//! `$VAR`/`~` expansion.
//!
//! ## Architecture
//!
//! - **Pattern** (`pattern`): glob → static root + prune prefix + anchored
//!   regex predicate
//! - **Glob** (`glob`): traversal orchestration over the `gust-walk` walker
//! - **Env** (`env`): injected environment/home lookups for compilation
//! - **Errors** (`error`): `thiserror`-based error types
//!
//! ## Example
//!
//! ```rust,ignore
//! use gust_core::{glob, is_match};
//!
//! for path in glob("src/**/*.rs")? {
//!     println!("{path}");
//! }
//! assert!(is_match("src/**/*.rs", "src/bin/main.rs")?);
//! ```

pub mod env;
pub mod error;
pub mod glob;
pub mod pattern;

mod pathutil;

// Re-export commonly used types
pub use env::{EnvLookup, OsEnv, StaticEnv};
pub use error::{GustError, Result};
pub use glob::{glob, glob_follow_symlinks, is_match};
pub use gust_walk::{EntryKind, FlowControl, WalkError};
pub use pattern::GlobPattern;
