//! Environment and home-directory lookups used during pattern compilation.
//!
//! The compiler resolves `$VAR`, `$(VAR)` and a leading `~` once, at compile
//! time. Those lookups go through the [`EnvLookup`] trait so tests can inject
//! a fixed environment instead of mutating the real process environment.

use std::collections::HashMap;
use std::env;

/// Capability for resolving environment variables and the home directory.
pub trait EnvLookup: Sync {
    /// Value of the named variable; empty string when unset.
    fn var(&self, name: &str) -> String;

    /// The current user's home directory; empty string when unknown.
    fn home_dir(&self) -> String;
}

/// Process-environment implementation of [`EnvLookup`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnv;

impl EnvLookup for OsEnv {
    fn var(&self, name: &str) -> String {
        env::var(name).unwrap_or_default()
    }

    fn home_dir(&self) -> String {
        let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
        env::var(var).unwrap_or_default()
    }
}

/// Map-backed implementation of [`EnvLookup`] for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: HashMap<String, String>,
    home: String,
}

impl StaticEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        StaticEnv::default()
    }

    /// Add a variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Set the home directory.
    pub fn with_home(mut self, home: impl Into<String>) -> Self {
        self.home = home.into();
        self
    }
}

impl EnvLookup for StaticEnv {
    fn var(&self, name: &str) -> String {
        self.vars.get(name).cloned().unwrap_or_default()
    }

    fn home_dir(&self) -> String {
        self.home.clone()
    }
}
