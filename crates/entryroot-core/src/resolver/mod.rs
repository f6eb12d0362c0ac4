//! Host module resolution.
//!
//! Entry specifiers are resolved the way the host bundler would resolve an
//! import, so a bare entry like `"app"` may land in `node_modules`. The host's
//! algorithm is abstracted behind [`ModuleResolver`]; [`NodeResolver`] is the
//! bundled node-style implementation.

mod node;

pub use node::{NodeResolver, DEFAULT_EXTENSIONS};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The host's module resolution algorithm.
pub trait ModuleResolver: Send + Sync {
    /// Resolve `specifier` as if imported from a file in `base`.
    fn resolve(&self, base: &Path, specifier: &str) -> Result<PathBuf, ResolutionError>;
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for &R {
    fn resolve(&self, base: &Path, specifier: &str) -> Result<PathBuf, ResolutionError> {
        (**self).resolve(base, specifier)
    }
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for Box<R> {
    fn resolve(&self, base: &Path, specifier: &str) -> Result<PathBuf, ResolutionError> {
        (**self).resolve(base, specifier)
    }
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for std::sync::Arc<R> {
    fn resolve(&self, base: &Path, specifier: &str) -> Result<PathBuf, ResolutionError> {
        (**self).resolve(base, specifier)
    }
}

/// Reason codes for unresolved specifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveReasonCode {
    SpecifierInvalid,
    UnsupportedScheme,
    NotFound,
    IsDirectory,
    NodeModulesNotFound,
    PackageMainNotFound,
}

impl std::fmt::Display for ResolveReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SpecifierInvalid => "SPECIFIER_INVALID",
            Self::UnsupportedScheme => "UNSUPPORTED_SCHEME",
            Self::NotFound => "NOT_FOUND",
            Self::IsDirectory => "IS_DIRECTORY",
            Self::NodeModulesNotFound => "NODE_MODULES_NOT_FOUND",
            Self::PackageMainNotFound => "PACKAGE_MAIN_NOT_FOUND",
        };
        write!(f, "{s}")
    }
}

/// A specifier could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot resolve '{specifier}' from '{}': {reason}", from.display())]
pub struct ResolutionError {
    /// The specifier as requested.
    pub specifier: String,
    /// Directory the resolution started from.
    pub from: PathBuf,
    /// Why it failed.
    pub reason: ResolveReasonCode,
    /// Candidate paths tried (capped).
    pub tried: Vec<PathBuf>,
}

impl ResolutionError {
    #[must_use]
    pub fn new(
        specifier: impl Into<String>,
        from: impl Into<PathBuf>,
        reason: ResolveReasonCode,
    ) -> Self {
        Self {
            specifier: specifier.into(),
            from: from.into(),
            reason,
            tried: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tried(mut self, tried: Vec<PathBuf>) -> Self {
        self.tried = tried;
        self
    }
}
