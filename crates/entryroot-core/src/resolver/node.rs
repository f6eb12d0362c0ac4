//! Node-style module resolution.
//!
//! Supports:
//! - Relative specifiers: `./`, `../`
//! - Absolute filesystem specifiers
//! - Bare specifiers with `node_modules` lookup (scoped names, subpaths)
//! - Extension probing
//! - Directory resolution (`package.json` main, then `index.*`)

use super::{ModuleResolver, ResolutionError, ResolveReasonCode};
use crate::config::BuildOptions;
use entryroot_util::path::normalize_lexically;
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default extensions for probing.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".json"];

/// Maximum number of tried paths to record.
const MAX_TRIED_PATHS: usize = 20;

/// Node-style resolver over the real filesystem.
#[derive(Debug, Clone)]
pub struct NodeResolver {
    extensions: Vec<String>,
}

impl Default for NodeResolver {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl NodeResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver probing the extensions configured for a build.
    #[must_use]
    pub fn from_options(options: &BuildOptions) -> Self {
        Self {
            extensions: options.extensions.clone(),
        }
    }

    /// Override the extension list (each with a leading dot).
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn resolve_specifier(
        &self,
        base: &Path,
        spec: &str,
        tried: &mut Vec<PathBuf>,
    ) -> Result<PathBuf, ResolveReasonCode> {
        if spec.is_empty() {
            return Err(ResolveReasonCode::SpecifierInvalid);
        }

        // URL-like specifiers
        if spec.contains("://") || spec.starts_with("node:") || spec.starts_with("data:") {
            return Err(ResolveReasonCode::UnsupportedScheme);
        }

        if is_relative(spec) {
            return self.resolve_path(&normalize_lexically(&base.join(spec)), tried);
        }

        if Path::new(spec).is_absolute() {
            return self.resolve_path(&normalize_lexically(Path::new(spec)), tried);
        }

        self.resolve_bare(base, spec, tried)
    }

    /// Resolve a path: exact file, then extension probing, then directory.
    fn resolve_path(
        &self,
        target: &Path,
        tried: &mut Vec<PathBuf>,
    ) -> Result<PathBuf, ResolveReasonCode> {
        add_tried(tried, target);
        if target.is_file() {
            return Ok(canonical(target));
        }

        if let Some(found) = self.probe_extensions(target, tried) {
            return Ok(found);
        }

        if target.is_dir() {
            return self.resolve_directory(target, tried);
        }

        Err(ResolveReasonCode::NotFound)
    }

    fn probe_extensions(&self, target: &Path, tried: &mut Vec<PathBuf>) -> Option<PathBuf> {
        for ext in &self.extensions {
            let with_ext = append_extension(target, ext);
            add_tried(tried, &with_ext);

            if with_ext.is_file() {
                return Some(canonical(&with_ext));
            }
        }
        None
    }

    fn probe_index(&self, dir: &Path, tried: &mut Vec<PathBuf>) -> Option<PathBuf> {
        self.probe_extensions(&dir.join("index"), tried)
    }

    /// Resolve a directory (package.json main > index.*).
    fn resolve_directory(
        &self,
        dir: &Path,
        tried: &mut Vec<PathBuf>,
    ) -> Result<PathBuf, ResolveReasonCode> {
        let pkg_json_path = dir.join("package.json");
        let mut main_missing = false;

        if pkg_json_path.is_file() {
            add_tried(tried, &pkg_json_path);

            if let Some(main) = read_pkg_main(&pkg_json_path) {
                let main_path = dir.join(&main);
                add_tried(tried, &main_path);

                if main_path.is_file() {
                    return Ok(canonical(&main_path));
                }
                if let Some(found) = self.probe_extensions(&main_path, tried) {
                    return Ok(found);
                }
                if main_path.is_dir() {
                    if let Some(found) = self.probe_index(&main_path, tried) {
                        return Ok(found);
                    }
                }
                main_missing = true;
            }
        }

        if let Some(found) = self.probe_index(dir, tried) {
            return Ok(found);
        }

        if main_missing {
            Err(ResolveReasonCode::PackageMainNotFound)
        } else {
            Err(ResolveReasonCode::IsDirectory)
        }
    }

    /// Resolve a bare specifier via `node_modules`, walking up from `base`.
    fn resolve_bare(
        &self,
        base: &Path,
        spec: &str,
        tried: &mut Vec<PathBuf>,
    ) -> Result<PathBuf, ResolveReasonCode> {
        // e.g., "lodash/fp" -> "lodash", "@scope/pkg/sub" -> "@scope/pkg"
        let (pkg_name, subpath) = parse_bare_specifier(spec);

        let mut found_node_modules = false;
        let mut specific_error = None;
        let mut current = Some(base);

        while let Some(dir) = current {
            let node_modules = dir.join("node_modules");

            if node_modules.is_dir() {
                found_node_modules = true;

                let pkg_dir = node_modules.join(pkg_name);
                add_tried(tried, &pkg_dir);

                if pkg_dir.is_dir() {
                    let result = match subpath {
                        Some(sub) => self.resolve_path(&pkg_dir.join(sub), tried),
                        None => self.resolve_directory(&pkg_dir, tried),
                    };
                    match result {
                        Ok(found) => return Ok(found),
                        Err(ResolveReasonCode::PackageMainNotFound) => {
                            specific_error = Some(ResolveReasonCode::PackageMainNotFound);
                        }
                        Err(_) => {}
                    }
                }
            }

            current = dir.parent();
        }

        if let Some(error) = specific_error {
            return Err(error);
        }

        if found_node_modules {
            Err(ResolveReasonCode::NotFound)
        } else {
            Err(ResolveReasonCode::NodeModulesNotFound)
        }
    }
}

impl ModuleResolver for NodeResolver {
    fn resolve(&self, base: &Path, specifier: &str) -> Result<PathBuf, ResolutionError> {
        let mut tried = Vec::new();
        let result = self.resolve_specifier(base, specifier, &mut tried);
        result.map_err(|reason| ResolutionError::new(specifier, base, reason).with_tried(tried))
    }
}

fn is_relative(spec: &str) -> bool {
    spec == "." || spec == ".." || spec.starts_with("./") || spec.starts_with("../")
}

/// `foo` + `.js` -> `foo.js`, keeping any dots already in the file name.
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(ext);
    PathBuf::from(s)
}

fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn read_pkg_main(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let value: Value = serde_json::from_str(&content).ok()?;
    value
        .get("main")
        .and_then(Value::as_str)
        .filter(|main| !main.is_empty())
        .map(ToString::to_string)
}

/// Parse a bare specifier into package name and optional subpath.
fn parse_bare_specifier(spec: &str) -> (&str, Option<&str>) {
    // Scoped package: @scope/pkg or @scope/pkg/subpath
    if spec.starts_with('@') {
        let mut slash_count = 0;
        for (i, c) in spec.char_indices() {
            if c == '/' {
                slash_count += 1;
                if slash_count == 2 {
                    return (&spec[..i], Some(&spec[i + 1..]));
                }
            }
        }
        return (spec, None);
    }

    if let Some(pos) = spec.find('/') {
        (&spec[..pos], Some(&spec[pos + 1..]))
    } else {
        (spec, None)
    }
}

/// Add a path to tried list (with cap).
fn add_tried(tried: &mut Vec<PathBuf>, path: &Path) {
    if tried.len() < MAX_TRIED_PATHS {
        tried.push(path.to_path_buf());
    }
}
