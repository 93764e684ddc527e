//! Lexical helpers for forward-slash path strings.
//!
//! Patterns and candidate paths are normalized to `/` separators regardless
//! of platform; all functions here are purely lexical (no filesystem access).

/// Normalize a pattern to forward slashes.
///
/// On platforms with a `\` separator, every backslash becomes `/` *except*
/// `\{` and `\}`, which stay escaped so brace alternation can be suppressed
/// literally. Elsewhere the pattern is returned unchanged.
pub(crate) fn to_slash_pattern(pattern: &str) -> String {
    if !cfg!(windows) {
        return pattern.to_string();
    }
    let cc: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < cc.len() {
        if i + 2 < cc.len() && cc[i] == '\\' && (cc[i + 1] == '{' || cc[i + 1] == '}') {
            out.push(cc[i]);
            out.push(cc[i + 1]);
            i += 1;
        } else if cc[i] == '\\' {
            out.push('/');
        } else {
            out.push(cc[i]);
        }
        i += 1;
    }
    out
}

/// Normalize a candidate path to forward slashes (no escape handling).
pub(crate) fn to_slash(path: &str) -> String {
    if cfg!(windows) {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}

/// Lexically simplify a slash path: collapse `//` and `.`, resolve `..`
/// where possible, strip trailing separators. Empty input becomes `.`.
pub(crate) fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if out.last().is_some_and(|s| *s != "..") {
                    out.pop();
                } else if !rooted {
                    out.push("..");
                }
            }
            seg => out.push(seg),
        }
    }
    let joined = out.join("/");
    match (rooted, joined.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join two slash-path fragments, cleaning the result. Empty fragments are
/// skipped; joining two empty fragments yields the empty string.
pub(crate) fn join(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => String::new(),
        (true, false) => clean(b),
        (false, true) => clean(a),
        (false, false) => clean(&format!("{a}/{b}")),
    }
}

/// Everything but the last element of a slash path, cleaned. Mirrors the
/// usual dirname semantics: no separator yields `.`.
pub(crate) fn dir_of(path: &str) -> String {
    match path.rfind('/') {
        Some(i) => clean(&path[..i + 1]),
        None => ".".to_string(),
    }
}

/// Whether a leading path segment names a drive-letter volume (`C:`).
/// Always false on platforms without volume names.
pub(crate) fn has_volume_name(segment: &str) -> bool {
    if !cfg!(windows) {
        return false;
    }
    let b = segment.as_bytes();
    b.len() >= 2 && b[0].is_ascii_alphabetic() && b[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_collapses_dots_and_slashes() {
        assert_eq!(clean(""), ".");
        assert_eq!(clean("."), ".");
        assert_eq!(clean("/"), "/");
        assert_eq!(clean("foo//bar"), "foo/bar");
        assert_eq!(clean("./foo/./bar/"), "foo/bar");
        assert_eq!(clean("foo/.."), ".");
        assert_eq!(clean("foo/../bar"), "bar");
        assert_eq!(clean("a/../../b"), "../b");
        assert_eq!(clean("/a/../.."), "/");
    }

    #[test]
    fn join_skips_empty_fragments() {
        assert_eq!(join("", ""), "");
        assert_eq!(join("", "foo"), "foo");
        assert_eq!(join("foo", ""), "foo");
        assert_eq!(join("foo", "bar"), "foo/bar");
        assert_eq!(join("/", "foo"), "/foo");
        assert_eq!(join(".", "f*"), "f*");
    }

    #[test]
    fn dir_of_drops_the_last_element() {
        assert_eq!(dir_of("foo/bar"), "foo");
        assert_eq!(dir_of("foo/bar/"), "foo/bar");
        assert_eq!(dir_of("foo"), ".");
        assert_eq!(dir_of(""), ".");
        assert_eq!(dir_of("/foo"), "/");
    }

    #[cfg(not(windows))]
    #[test]
    fn pattern_slashes_untouched_on_unix() {
        assert_eq!(to_slash_pattern(r"zzz\{a,b\}"), r"zzz\{a,b\}");
        assert_eq!(to_slash("foo/bar"), "foo/bar");
        assert!(!has_volume_name("C:"));
    }
}
