//! Entry roots: the directories holding each entry module.

use crate::entry::{normalize, EntryConfig};
use crate::error::Error;
use crate::resolver::ModuleResolver;
use entryroot_util::path::{absolutize, contains_path, strip_query};
use rustc_hash::FxHashSet as HashSet;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Ordered, deduplicated absolute directories.
///
/// Order is first occurrence during normalization and decides which root
/// wins when roots are nested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntryRootSet {
    roots: Vec<PathBuf>,
}

impl EntryRootSet {
    /// Build a root set from directories, dropping repeats.
    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut seen = HashSet::default();
        let mut roots = Vec::new();
        for dir in dirs {
            let dir = dir.into();
            if seen.insert(dir.clone()) {
                roots.push(dir);
            }
        }
        Self { roots }
    }

    /// First root that is `dir` or an ancestor of it.
    #[must_use]
    pub fn find_containing(&self, dir: &Path) -> Option<&Path> {
        self.roots
            .iter()
            .map(PathBuf::as_path)
            .find(|root| contains_path(root, dir))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.roots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Compute the entry roots of a build.
///
/// Every normalized specifier has its query suffix removed, is resolved from
/// `context` with the host's resolver, and contributes the directory of the
/// resolved file. A relative `context` is taken against the process working
/// directory.
///
/// # Errors
/// Fails with [`Error::Entry`] for an unsupported entry shape and with
/// [`Error::Resolution`] for the first specifier that does not resolve.
pub fn compute_roots(
    entry: &EntryConfig,
    context: &Path,
    resolver: &dyn ModuleResolver,
) -> Result<EntryRootSet, Error> {
    let normalized = normalize(entry)?;

    let context = if context.is_absolute() {
        context.to_path_buf()
    } else {
        absolutize(context, &std::env::current_dir()?)
    };

    let mut dirs = Vec::with_capacity(normalized.len());
    for specifier in normalized.specifiers() {
        let resolved = resolver.resolve(&context, strip_query(specifier))?;
        let dir = resolved
            .parent()
            .map_or_else(|| resolved.clone(), Path::to_path_buf);
        dirs.push(dir);
    }

    Ok(EntryRootSet::from_dirs(dirs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryValue;
    use crate::error::ConfigError;
    use crate::resolver::{NodeResolver, ResolutionError, ResolveReasonCode};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Joins specifiers onto the base without touching the filesystem, and
    /// records what it was asked for.
    #[derive(Default)]
    struct JoinResolver {
        requests: Mutex<Vec<String>>,
    }

    impl ModuleResolver for JoinResolver {
        fn resolve(&self, base: &Path, specifier: &str) -> Result<PathBuf, ResolutionError> {
            self.requests.lock().unwrap().push(specifier.to_string());
            if specifier.contains("missing") {
                return Err(ResolutionError::new(
                    specifier,
                    base,
                    ResolveReasonCode::NotFound,
                ));
            }
            Ok(absolutize(Path::new(specifier), base))
        }
    }

    #[test]
    fn test_unique_directories() {
        let entry = EntryConfig::from(vec!["./one.js", "./two.js"]);
        let roots = compute_roots(&entry, Path::new("/proj/src"), &JoinResolver::default()).unwrap();

        assert_eq!(roots.as_slice(), [PathBuf::from("/proj/src")]);
    }

    #[test]
    fn test_order_is_first_occurrence() {
        let entry = EntryConfig::mapping([
            ("b", EntryValue::from("./b/index.js")),
            ("a", EntryValue::from(vec!["./a/one.js", "./b/two.js", "./a/three.js"])),
        ]);
        let roots = compute_roots(&entry, Path::new("/proj"), &JoinResolver::default()).unwrap();

        assert_eq!(
            roots.as_slice(),
            [PathBuf::from("/proj/b"), PathBuf::from("/proj/a")]
        );
    }

    #[test]
    fn test_query_stripped_before_resolving() {
        let resolver = JoinResolver::default();
        let entry = EntryConfig::from("./lib/mod?query");
        let roots = compute_roots(&entry, Path::new("/proj"), &resolver).unwrap();

        assert_eq!(*resolver.requests.lock().unwrap(), vec!["./lib/mod"]);
        assert_eq!(roots.as_slice(), [PathBuf::from("/proj/lib")]);
    }

    #[test]
    fn test_relative_context_uses_cwd() {
        let entry = EntryConfig::from("./index.js");
        let roots = compute_roots(&entry, Path::new("src"), &JoinResolver::default()).unwrap();

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(roots.as_slice(), [absolutize(Path::new("src"), &cwd)]);
    }

    #[test]
    fn test_unresolvable_entry_fails() {
        let entry = EntryConfig::from(vec!["./ok.js", "./missing.js"]);
        let err = compute_roots(&entry, Path::new("/proj"), &JoinResolver::default()).unwrap_err();

        match err {
            Error::Resolution(e) => assert_eq!(e.specifier, "./missing.js"),
            other => panic!("expected resolution error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_entry_fails_before_resolving() {
        let resolver = JoinResolver::default();
        let err = compute_roots(
            &EntryConfig::unsupported("number"),
            Path::new("/proj"),
            &resolver,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Entry(ConfigError::UnsupportedShape { .. })
        ));
        assert!(resolver.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_bare_entry_through_node_modules() {
        let dir = tempdir().unwrap();
        let root = dunce::canonicalize(dir.path()).unwrap();
        let pkg = root.join("node_modules/app");
        fs::create_dir_all(pkg.join("src")).unwrap();
        fs::write(pkg.join("package.json"), r#"{"main": "src/main.js"}"#).unwrap();
        fs::write(pkg.join("src/main.js"), "").unwrap();

        let roots = compute_roots(&EntryConfig::from("app"), &root, &NodeResolver::new()).unwrap();
        assert_eq!(roots.as_slice(), [pkg.join("src")]);
    }

    #[test]
    fn test_find_containing_first_match_wins() {
        let roots = EntryRootSet::from_dirs(["/proj", "/proj/a"]);
        assert_eq!(
            roots.find_containing(Path::new("/proj/a/x")),
            Some(Path::new("/proj"))
        );

        let roots = EntryRootSet::from_dirs(["/proj/a", "/proj"]);
        assert_eq!(
            roots.find_containing(Path::new("/proj/a/x")),
            Some(Path::new("/proj/a"))
        );
        assert_eq!(roots.find_containing(Path::new("/other")), None);
    }

    #[test]
    fn test_from_dirs_dedups() {
        let roots = EntryRootSet::from_dirs(["/a", "/b", "/a"]);
        assert_eq!(roots.len(), 2);
        assert!(!roots.is_empty());
        assert_eq!(
            roots.iter().collect::<Vec<_>>(),
            vec![Path::new("/a"), Path::new("/b")]
        );
    }
}
