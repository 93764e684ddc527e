//! End-to-end glob resolution over a real temporary tree: the table-driven
//! behavior matrix (relative and absolute), the pure single-path matcher,
//! symlink handling, and the prune-equivalence property.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gust_core::{glob, glob_follow_symlinks, is_match, GlobPattern, GustError};
use tempfile::TempDir;

enum Expect {
    Paths(&'static [&'static str]),
    CompileError,
    NotFound,
}

use Expect::{CompileError, NotFound, Paths};

#[rustfmt::skip]
const CASES: &[(&str, Expect)] = &[
    ("fo*", Paths(&["foo"])),
    ("foo", Paths(&["foo"])),
    ("foo/*", Paths(&["foo/bar", "foo/baz"])),
    ("foo/b[a]*", Paths(&["foo/bar", "foo/baz"])),
    ("foo/b[a][r]*", Paths(&["foo/bar"])),
    ("foo/b[a-z]*", Paths(&["foo/bar", "foo/baz"])),
    ("foo/b[c-z]*", Paths(&[])),
    ("foo/b[z-c]*", CompileError),
    ("foo/**", Paths(&["foo/bar", "foo/baz"])),
    ("f*o/**", Paths(&["foo/bar", "foo/baz"])),
    ("*oo/**", Paths(&["foo/bar", "foo/baz", "hoo/bar"])),
    ("*oo/b*", Paths(&["foo/bar", "foo/baz", "hoo/bar"])),
    ("*oo/bar", Paths(&["foo/bar", "hoo/bar"])),
    ("*oo/*z", Paths(&["foo/baz"])),
    ("foo/**/*", Paths(&["foo/bar", "foo/bar/baz", "foo/bar/baz.txt", "foo/bar/baz/noo.txt", "foo/baz"])),
    ("*oo/**/*", Paths(&["foo/bar", "foo/bar/baz", "foo/bar/baz.txt", "foo/bar/baz/noo.txt", "foo/baz", "hoo/bar"])),
    ("*oo/*.txt", Paths(&[])),
    ("*oo/*/*.txt", Paths(&["foo/bar/baz.txt"])),
    ("*oo/**/*.txt", Paths(&["foo/bar/baz.txt", "foo/bar/baz/noo.txt"])),
    ("doo", NotFound),
    ("./f*", Paths(&["foo"])),
    ("**/bar/**/*.txt", Paths(&["foo/bar/baz.txt", "foo/bar/baz/noo.txt"])),
    ("**/bar/**/*.{jpg,png}", Paths(&["zzz/bar/baz/joo.png", "zzz/bar/baz/zoo.jpg"])),
    ("zzz/bar/baz/zoo.{jpg,png}", Paths(&["zzz/bar/baz/zoo.jpg"])),
    ("zzz/bar/{baz,z}/zoo.jpg", Paths(&["zzz/bar/baz/zoo.jpg"])),
    (r"zzz/nar/\{noo,x\}/joo.png", Paths(&["zzz/nar/{noo,x}/joo.png"])),
];

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    for dir in [
        "foo/baz",
        "foo/bar/baz",
        "hoo/bar",
        "zzz/bar/baz",
        "zzz/nar/{noo,x}",
    ] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
    for file in [
        "foo/bar/baz.txt",
        "foo/bar/baz/noo.txt",
        "zzz/bar/baz/zoo.jpg",
        "zzz/bar/baz/joo.png",
        "zzz/nar/{noo,x}/joo.png",
    ] {
        File::create(root.join(file)).unwrap();
    }
    tmp
}

/// Run `f` with the working directory set to `dir`. The process working
/// directory is global state, so callers are serialized and the previous
/// directory is restored even on panic.
fn with_cwd<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    static CWD_LOCK: Mutex<()> = Mutex::new(());

    struct Restore(PathBuf);
    impl Drop for Restore {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _restore = Restore(std::env::current_dir().unwrap());
    std::env::set_current_dir(dir).unwrap();
    f()
}

fn sorted(mut paths: Vec<String>) -> Vec<String> {
    paths.sort();
    paths
}

fn check_case(pattern: &str, expect: &Expect, result: gust_core::Result<Vec<String>>, expected_paths: Vec<String>) {
    match expect {
        Paths(_) => {
            let got = sorted(result.unwrap_or_else(|e| panic!("pattern {pattern:?} failed: {e}")));
            assert_eq!(got, sorted(expected_paths), "pattern {pattern:?}");
        }
        CompileError => {
            assert!(
                matches!(result, Err(GustError::InvalidPattern { .. })),
                "pattern {pattern:?} should fail to compile"
            );
        }
        NotFound => {
            assert!(
                matches!(result, Err(GustError::NotFound { .. })),
                "pattern {pattern:?} should report not-found"
            );
        }
    }
}

#[test]
fn resolves_relative_patterns() {
    let tmp = fixture();
    with_cwd(tmp.path(), || {
        for (pattern, expect) in CASES {
            let expected = match expect {
                Paths(paths) => paths.iter().map(|p| p.to_string()).collect(),
                _ => Vec::new(),
            };
            check_case(pattern, expect, glob(pattern), expected);
        }
    });
}

#[test]
fn resolves_absolute_patterns() {
    let tmp = fixture();
    let base = tmp.path().to_str().unwrap();
    for (pattern, expect) in CASES {
        let abs_pattern = format!("{base}/{pattern}");
        let expected = match expect {
            Paths(paths) => paths.iter().map(|p| format!("{base}/{p}")).collect(),
            _ => Vec::new(),
        };
        check_case(&abs_pattern, expect, glob(&abs_pattern), expected);
    }
}

#[test]
fn every_resolved_path_matches_its_pattern() {
    for (pattern, expect) in CASES {
        if let Paths(paths) = expect {
            for path in *paths {
                assert!(
                    is_match(pattern, path).unwrap(),
                    "{path:?} should match {pattern:?}"
                );
            }
        }
    }
}

#[test]
fn single_character_names_resolve_but_fail_the_pure_matcher() {
    let tmp = TempDir::new().unwrap();
    File::create(tmp.path().join("a")).unwrap();

    with_cwd(tmp.path(), || {
        // Resolution reports the file, yet the standalone matcher refuses
        // names no longer than the `.` root.
        assert_eq!(glob("*").unwrap(), vec!["a"]);
        assert!(!is_match("*", "a").unwrap());
    });
}

#[test]
fn pruning_is_invisible_in_results() {
    fn collect_tree(dir: &Path, prefix: &str, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let name = entry.file_name().into_string().unwrap();
            let rel = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };
            if entry.file_type().unwrap().is_dir() {
                collect_tree(&entry.path(), &rel, out);
            }
            out.push(rel);
        }
    }

    let tmp = fixture();
    with_cwd(tmp.path(), || {
        let mut tree = Vec::new();
        collect_tree(Path::new("."), "", &mut tree);

        // A full scan filtered through the pure matcher must agree with the
        // pruned traversal for every pattern shape.
        for pattern in [
            "foo/*",
            "foo/**/*",
            "*oo/**/*.txt",
            "**/bar/**/*.{jpg,png}",
            "zzz/bar/baz/zoo.{jpg,png}",
        ] {
            let compiled = GlobPattern::compile(pattern).unwrap();
            let expected: Vec<String> = tree
                .iter()
                .filter(|p| compiled.matches(p))
                .cloned()
                .collect();
            assert_eq!(
                sorted(glob(pattern).unwrap()),
                sorted(expected),
                "pattern {pattern:?}"
            );
        }
    });
}

#[cfg(unix)]
#[test]
fn symlink_matches_as_leaf_without_following() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("foo")).unwrap();
    File::create(tmp.path().join("foo/baz.txt")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("foo"), tmp.path().join("bar")).unwrap();

    with_cwd(tmp.path(), || {
        let got = sorted(glob("**/*").unwrap());
        assert_eq!(got, vec!["bar", "foo", "foo/baz.txt"]);
    });
}

#[cfg(unix)]
#[test]
fn following_symlinks_descends_into_their_targets() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("foo")).unwrap();
    File::create(tmp.path().join("foo/baz.txt")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("foo"), tmp.path().join("bar")).unwrap();

    with_cwd(tmp.path(), || {
        let got = sorted(glob_follow_symlinks("**/*").unwrap());
        assert_eq!(got, vec!["bar/baz.txt", "foo", "foo/baz.txt"]);
    });
}

#[cfg(unix)]
#[test]
fn sibling_symlinks_to_one_directory_all_resolve() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("real")).unwrap();
    File::create(tmp.path().join("real/data.txt")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link1")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link2")).unwrap();

    with_cwd(tmp.path(), || {
        let got = sorted(glob_follow_symlinks("**/*.txt").unwrap());
        assert_eq!(got, vec!["link1/data.txt", "link2/data.txt", "real/data.txt"]);
    });
}

#[cfg(unix)]
#[test]
fn symlink_cycles_terminate() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("a")).unwrap();
    fs::create_dir_all(tmp.path().join("b")).unwrap();
    File::create(tmp.path().join("a/file_a.txt")).unwrap();
    File::create(tmp.path().join("b/file_b.txt")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("b"), tmp.path().join("a/link_to_b")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("a"), tmp.path().join("b/link_to_a")).unwrap();

    with_cwd(tmp.path(), || {
        let got = glob_follow_symlinks("**/*.txt").unwrap();
        assert!(got.contains(&"a/file_a.txt".to_string()));
        assert!(got.contains(&"b/file_b.txt".to_string()));
    });
}

#[cfg(unix)]
#[test]
fn traversal_errors_abort_the_call() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("foo")).unwrap();
    fs::set_permissions(tmp.path().join("foo"), fs::Permissions::from_mode(0o222)).unwrap();

    if fs::read_dir(tmp.path().join("foo")).is_ok() {
        // Running with CAP_DAC_OVERRIDE (e.g. as root); permission bits
        // cannot make the directory unreadable.
        fs::set_permissions(tmp.path().join("foo"), fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    with_cwd(tmp.path(), || {
        let result = glob("foo/*");
        assert!(matches!(result, Err(GustError::Traversal(_))));
    });

    fs::set_permissions(tmp.path().join("foo"), fs::Permissions::from_mode(0o755)).unwrap();
}
