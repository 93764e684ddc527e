//! Glob-to-pattern compilation.
//!
//! [`GlobPattern::compile`] turns an extended glob string into an anchored
//! match predicate plus two traversal hints:
//!
//! - the **static root**: the longest wildcard-free leading segment run,
//!   where traversal starts (absent for wildcard-free literal patterns);
//! - the **directory mask**: the literal directory prefix guaranteed to
//!   contain every possible match, used to prune subtrees.
//!
//! Compilation runs in two passes. Pass one walks `/`-separated segments,
//! expanding `~` and `$VAR`/`$(VAR)` and freezing the static root at the
//! first wildcard-bearing segment. Pass two scans the expanded string
//! character by character and emits an anchored regular expression:
//!
//! | glob | regex |
//! |------|-------|
//! | `*` | `[^/]*` |
//! | `**/` | `(.*/)?` |
//! | `{a,b}` | `(a\|b)` |
//! | `[a-z]` | `[a-z]` |
//! | `!(x)` | `[^\x78/]*` per char |
//! | `\X`, other punctuation | `[\xNN]` |
//!
//! The expression is wrapped `(?i:...)` on platforms with case-insensitive
//! filesystems and anchored `^...$`, so it can never report a partial match.

use std::sync::LazyLock;

use regex::Regex;

use crate::env::{EnvLookup, OsEnv};
use crate::error::{GustError, Result};
use crate::pathutil::{clean, dir_of, has_volume_name, join, to_slash, to_slash_pattern};

/// Shape of a `$NAME` / `$(NAME)` environment segment.
static ENV_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\$[a-zA-Z][a-zA-Z0-9_]+|\$\([a-zA-Z][a-zA-Z0-9_]+\))$")
        .expect("environment segment shape is a valid regex")
});

/// A compiled glob pattern, immutable once built.
///
/// Built once per `glob`/`is_match` call and discarded afterwards; there is
/// no cross-call caching. Environment variables are resolved at compile
/// time, never per traversed entry.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    pattern: String,
    plan: MatchPlan,
}

/// How a compiled pattern is evaluated.
#[derive(Debug, Clone)]
pub(crate) enum MatchPlan {
    /// No wildcard anywhere: matching degrades to exact string equality and
    /// globbing to an existence check.
    Literal,
    /// Traverse from `root`, pruning with `dir_mask`, matching with the
    /// anchored `matcher`.
    Walk {
        root: String,
        dir_mask: String,
        matcher: Regex,
    },
}

impl GlobPattern {
    /// Compile `pattern` against the process environment.
    pub fn compile(pattern: &str) -> Result<Self> {
        Self::compile_with(pattern, &OsEnv)
    }

    /// Compile `pattern`, resolving `~` and `$VAR` through `env`.
    pub fn compile_with(pattern: &str, env: &dyn EnvLookup) -> Result<Self> {
        // Pass 1: segment-wise literal resolution. Freeze the static root at
        // the first segment carrying a wildcard construct; expand `~` and
        // environment segments; accumulate the expanded path.
        let mut glob_mask = String::new();
        let mut root = String::new();
        for (n, seg) in to_slash_pattern(pattern).split('/').enumerate() {
            if root.is_empty() && seg.contains(['*', '{', '[']) {
                root = if glob_mask.is_empty() {
                    ".".to_string()
                } else {
                    glob_mask.clone()
                };
            }
            let mut seg = seg.to_string();
            if n == 0 && seg == "~" {
                seg = env.home_dir();
            }
            if ENV_SEGMENT.is_match(&seg) {
                let name = seg[1..].trim_matches(['(', ')']).to_string();
                seg = env
                    .var(&name)
                    .trim_matches(['(', ')'])
                    .trim_matches('"')
                    .to_string();
            }
            glob_mask = join(&glob_mask, &seg);
            if n == 0 {
                if has_volume_name(&seg) {
                    glob_mask = format!("{seg}/");
                } else if glob_mask.is_empty() {
                    glob_mask = "/".to_string();
                }
            }
        }

        if root.is_empty() {
            return Ok(GlobPattern {
                pattern: pattern.to_string(),
                plan: MatchPlan::Literal,
            });
        }
        if glob_mask.is_empty() {
            glob_mask = ".".to_string();
        }
        let glob_mask = to_slash_pattern(&clean(&glob_mask));

        // Pass 2: character-level regex synthesis. `dir_mask` collects the
        // literal directory prefix until the first wildcard construct.
        let cc: Vec<char> = glob_mask.chars().collect();
        let mut dir_mask = String::new();
        let mut file_mask = String::new();
        let mut static_dir = true;
        let mut i = 0;
        while i < cc.len() {
            if i + 2 < cc.len() && cc[i] == '\\' {
                i += 1;
                file_mask.push_str(&hex_class(cc[i]));
                if static_dir {
                    dir_mask.push(cc[i]);
                }
            } else if cc[i] == '*' {
                static_dir = false;
                if i + 2 < cc.len() && cc[i + 1] == '*' && cc[i + 2] == '/' {
                    // `**/` spans whole segments, including none.
                    file_mask.push_str("(.*/)?");
                    i += 2;
                } else {
                    file_mask.push_str("[^/]*");
                }
            } else {
                if cc[i] == '{' {
                    static_dir = false;
                    let mut alt = String::new();
                    let mut end = None;
                    for j in (i + 1)..cc.len() {
                        match cc[j] {
                            ',' => alt.push('|'),
                            '}' => {
                                end = Some(j);
                                break;
                            }
                            c if c == '/' || c.is_ascii_alphanumeric() || c as u32 > 255 => {
                                alt.push(c)
                            }
                            c => alt.push_str(&hex_class(c)),
                        }
                    }
                    let Some(j) = end else {
                        return Err(GustError::invalid_pattern(
                            pattern,
                            "unterminated brace group",
                        ));
                    };
                    i = j;
                    if !alt.is_empty() {
                        file_mask.push('(');
                        file_mask.push_str(&alt);
                        file_mask.push(')');
                        i += 1;
                        continue;
                    }
                    // Empty `{}`: the closing brace is emitted literally below.
                } else if cc[i] == '[' {
                    let mut class = String::new();
                    let mut end = None;
                    for j in (i + 1)..cc.len() {
                        if cc[j] == ']' {
                            end = Some(j);
                            break;
                        }
                        class.push(cc[j]);
                    }
                    let Some(j) = end else {
                        return Err(GustError::invalid_pattern(
                            pattern,
                            "unterminated character class",
                        ));
                    };
                    i = j;
                    if !class.is_empty() {
                        static_dir = false;
                        // Passed through verbatim; malformed ranges surface
                        // when the final expression is compiled.
                        file_mask.push('[');
                        file_mask.push_str(&class);
                        file_mask.push(']');
                        i += 1;
                        continue;
                    }
                    // Empty `[]`: the closing bracket is emitted literally below.
                } else if i + 1 < cc.len() && cc[i] == '!' && cc[i + 1] == '(' {
                    i += 1;
                    let mut neg = String::new();
                    let mut end = None;
                    for j in (i + 1)..cc.len() {
                        if cc[j] == ')' {
                            end = Some(j);
                            break;
                        }
                        neg.push_str(&format!("[^\\x{:02X}/]*", cc[j] as u32));
                    }
                    let Some(j) = end else {
                        return Err(GustError::invalid_pattern(
                            pattern,
                            "unterminated negation group",
                        ));
                    };
                    i = j;
                    if !neg.is_empty() {
                        // First negation group: everything built so far is
                        // the prune prefix, and the fallback root.
                        if dir_mask.is_empty() {
                            dir_mask = file_mask.clone();
                            root = file_mask.clone();
                        }
                        file_mask.push_str(&neg);
                        i += 1;
                        continue;
                    }
                    // Empty `!()`: the closing paren is emitted literally below.
                }
                let c = cc[i];
                if c == '/' || c.is_ascii_alphanumeric() || c as u32 > 255 {
                    file_mask.push(c);
                } else {
                    file_mask.push_str(&hex_class(c));
                }
                if static_dir {
                    dir_mask.push(c);
                }
            }
            i += 1;
        }

        // A trailing slash means "the directory's immediate contents".
        if file_mask.ends_with('/') {
            if root.is_empty() {
                root = file_mask.clone();
            }
            file_mask.push_str("[^/]*");
        }
        if cfg!(any(windows, target_os = "macos")) {
            file_mask = format!("(?i:{file_mask})");
        }

        let matcher = Regex::new(&format!("^{file_mask}$"))
            .map_err(|e| GustError::invalid_pattern(pattern, e.to_string()))?;

        Ok(GlobPattern {
            pattern: pattern.to_string(),
            plan: MatchPlan::Walk {
                root: clean(&to_slash(&root)),
                dir_mask: format!("{}/", dir_of(&dir_mask)),
                matcher,
            },
        })
    }

    /// The original pattern string.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Whether the pattern is a plain path with no wildcard construct.
    pub fn is_literal(&self) -> bool {
        matches!(self.plan, MatchPlan::Literal)
    }

    /// The wildcard-free leading path traversal starts from, or `None` for
    /// literal patterns.
    pub fn root(&self) -> Option<&str> {
        match &self.plan {
            MatchPlan::Literal => None,
            MatchPlan::Walk { root, .. } => Some(root),
        }
    }

    pub(crate) fn plan(&self) -> &MatchPlan {
        &self.plan
    }

    /// Evaluate the pattern against a single path, with no I/O.
    ///
    /// Literal patterns require exact equality. Otherwise the candidate is
    /// slash-normalized, trivially short candidates (`.` or no longer than
    /// the static root) are rejected, and the anchored predicate decides.
    ///
    /// The length rejection is unconditional: a name exactly as long as the
    /// root is refused even when the predicate alone would accept it, so a
    /// single-character file that [`crate::glob`] resolves under a
    /// `.`-rooted pattern still fails here.
    pub fn matches(&self, name: &str) -> bool {
        match &self.plan {
            MatchPlan::Literal => self.pattern == name,
            MatchPlan::Walk { root, matcher, .. } => {
                let name = to_slash(name);
                if name == "." || name.len() <= root.len() {
                    return false;
                }
                matcher.is_match(&name)
            }
        }
    }
}

fn hex_class(c: char) -> String {
    format!("[\\x{:02X}]", c as u32)
}
