//! Path helpers for entry root matching.
//!
//! Everything here is lexical: no function touches the filesystem, so results
//! are stable for paths that do not exist yet.

use std::path::{Component, Path, PathBuf};

/// Fold `.` and `..` components without consulting the filesystem.
///
/// `..` at the root is dropped, matching how `path.resolve` treats `/..`.
/// A relative path keeps leading `..` components it cannot fold.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Make `path` absolute by joining it onto `cwd` when it is relative, then
/// normalize it lexically.
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&cwd.join(path))
    }
}

/// Returns `true` if `path` is `root` itself or lies below it.
///
/// Comparison is per path component, so `/foo-bar` is not inside `/foo`.
#[must_use]
pub fn contains_path(root: &Path, path: &Path) -> bool {
    normalize_lexically(path).starts_with(normalize_lexically(root))
}

/// Strip a query suffix (`?` and everything after it) from a module specifier.
#[must_use]
pub fn strip_query(specifier: &str) -> &str {
    specifier
        .find('?')
        .map_or(specifier, |pos| &specifier[..pos])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically_folds_dots() {
        assert_eq!(
            normalize_lexically(Path::new("/proj/./a/../b")),
            PathBuf::from("/proj/b")
        );
        assert_eq!(
            normalize_lexically(Path::new("/proj/a/")),
            PathBuf::from("/proj/a")
        );
    }

    #[test]
    fn test_normalize_lexically_parent_at_root() {
        assert_eq!(normalize_lexically(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(
            normalize_lexically(Path::new("/../proj")),
            PathBuf::from("/proj")
        );
    }

    #[test]
    fn test_normalize_lexically_relative() {
        assert_eq!(
            normalize_lexically(Path::new("../a/./b/..")),
            PathBuf::from("../a")
        );
        assert_eq!(normalize_lexically(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_absolutize() {
        let cwd = Path::new("/work");
        assert_eq!(absolutize(Path::new("src"), cwd), PathBuf::from("/work/src"));
        assert_eq!(
            absolutize(Path::new("../other"), cwd),
            PathBuf::from("/other")
        );
        assert_eq!(
            absolutize(Path::new("/abs/./dir"), cwd),
            PathBuf::from("/abs/dir")
        );
    }

    #[test]
    fn test_contains_path_same_and_descendant() {
        let root = Path::new("/proj/a");
        assert!(contains_path(root, Path::new("/proj/a")));
        assert!(contains_path(root, Path::new("/proj/a/deep/er")));
        assert!(contains_path(root, Path::new("/proj/b/../a/x")));
    }

    #[test]
    fn test_contains_path_respects_segments() {
        assert!(!contains_path(Path::new("/foo"), Path::new("/foo-bar")));
        assert!(!contains_path(Path::new("/foo"), Path::new("/foobar/baz")));
        assert!(!contains_path(Path::new("/proj/a"), Path::new("/proj")));
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("./mod?query"), "./mod");
        assert_eq!(strip_query("./mod?a=1?b=2"), "./mod");
        assert_eq!(strip_query("./mod"), "./mod");
        assert_eq!(strip_query("?only"), "");
    }
}
