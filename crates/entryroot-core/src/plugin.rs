//! Plugin interface of the resolution pipeline.
//!
//! A [`Plugin`] is applied once, after the host's resolvers are constructed,
//! and may tap [`ModuleHook`]s into the pipeline. A module hook sees every
//! bare-specifier request and answers with a [`HookOutcome`]: either a derived
//! request the host should resolve instead, or a pass-through.
//!
//! ## Example
//!
//! ```
//! use entryroot_core::plugin::{HookOutcome, ModuleHook, ResolveRequest};
//!
//! struct VendorHook;
//!
//! impl ModuleHook<()> for VendorHook {
//!     fn name(&self) -> &str { "vendor" }
//!
//!     fn module(&self, request: &ResolveRequest<()>) -> HookOutcome<()> {
//!         if request.request.starts_with("vendor/") {
//!             return HookOutcome::Rewritten(request.with_path("/opt/vendor"));
//!         }
//!         HookOutcome::PassThrough
//!     }
//! }
//!
//! let hook = VendorHook;
//! let request = ResolveRequest::new("/app/src", "vendor/jquery", ());
//! match hook.module(&request) {
//!     HookOutcome::Rewritten(derived) => {
//!         assert_eq!(derived.path, std::path::Path::new("/opt/vendor"));
//!         assert_eq!(derived.request, "vendor/jquery");
//!     }
//!     HookOutcome::PassThrough => unreachable!(),
//! }
//!
//! let other = ResolveRequest::new("/app/src", "lodash", ());
//! assert!(!hook.module(&other).is_rewritten());
//! ```

use crate::config::BuildOptions;
use crate::error::Error;
use crate::resolver::ModuleResolver;
use std::path::PathBuf;

/// A module resolution request as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest<C = ()> {
    /// Directory the request originates from.
    pub path: PathBuf,
    /// Specifier to resolve.
    pub request: String,
    /// Host resolution context, opaque to hooks.
    pub context: C,
}

impl<C> ResolveRequest<C> {
    pub fn new(path: impl Into<PathBuf>, request: impl Into<String>, context: C) -> Self {
        Self {
            path: path.into(),
            request: request.into(),
            context,
        }
    }
}

impl<C: Clone> ResolveRequest<C> {
    /// Copy of this request anchored at another directory.
    #[must_use]
    pub fn with_path(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            request: self.request.clone(),
            context: self.context.clone(),
        }
    }

    /// Copy of this request with another specifier.
    #[must_use]
    pub fn with_request(&self, request: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            request: request.into(),
            context: self.context.clone(),
        }
    }
}

/// What a module hook decided for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome<C> {
    /// Resolve this derived request instead of the original.
    Rewritten(ResolveRequest<C>),
    /// Not handled; continue with the original request.
    PassThrough,
}

impl<C> HookOutcome<C> {
    #[must_use]
    pub fn is_rewritten(&self) -> bool {
        matches!(self, Self::Rewritten(_))
    }
}

/// Per-request extension point.
///
/// Hooks may be invoked concurrently and must not block on the host.
pub trait ModuleHook<C>: Send + Sync {
    /// Hook name for tracing and error messages.
    fn name(&self) -> &str;

    /// Decide how `request` should be resolved.
    fn module(&self, request: &ResolveRequest<C>) -> HookOutcome<C>;
}

/// Hooks registered by plugins, in registration order.
pub struct ResolverHooks<C> {
    module: Vec<Box<dyn ModuleHook<C>>>,
}

impl<C> Default for ResolverHooks<C> {
    fn default() -> Self {
        Self { module: Vec::new() }
    }
}

impl<C> ResolverHooks<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module hook.
    pub fn tap_module(&mut self, hook: Box<dyn ModuleHook<C>>) {
        self.module.push(hook);
    }

    /// Move all hooks of `other` after the existing ones.
    pub fn append(&mut self, other: ResolverHooks<C>) {
        self.module.extend(other.module);
    }

    pub fn module_hooks(&self) -> impl Iterator<Item = &dyn ModuleHook<C>> {
        self.module.iter().map(|hook| hook.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.module.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.module.is_empty()
    }
}

/// Setup-time extension point.
pub trait Plugin<C>: Send + Sync {
    /// Plugin name for debugging and error messages.
    fn name(&self) -> &str;

    /// Called once after the host's resolvers are constructed.
    ///
    /// Hooks tapped into `hooks` are only installed if this returns `Ok`.
    fn after_resolvers(
        &self,
        options: &BuildOptions,
        resolver: &dyn ModuleResolver,
        hooks: &mut ResolverHooks<C>,
    ) -> Result<(), Error>;
}
