//! Entry-local bare imports.
//!
//! [`ResolveEntryModulesPlugin`] computes the build's entry roots during setup
//! and taps an [`EntryRootInterceptor`] into the module stage. A bare
//! specifier requested from inside an entry root is then resolved as a file
//! relative to that root: `import "sibling"` from `/proj/a/deep` becomes
//! `./sibling` from `/proj/a` when `/proj/a` holds an entry module.

use crate::config::BuildOptions;
use crate::error::Error;
use crate::plugin::{HookOutcome, ModuleHook, Plugin, ResolveRequest, ResolverHooks};
use crate::resolver::ModuleResolver;
use crate::roots::{compute_roots, EntryRootSet};
use std::sync::Arc;

/// Name the plugin and its hook register under.
pub const PLUGIN_NAME: &str = "resolve-entry-modules";

/// Rewrites requests originating inside an entry root.
///
/// Holds only the immutable root set; cloning shares it.
#[derive(Debug, Clone)]
pub struct EntryRootInterceptor {
    roots: Arc<EntryRootSet>,
}

impl EntryRootInterceptor {
    #[must_use]
    pub fn new(roots: EntryRootSet) -> Self {
        Self {
            roots: Arc::new(roots),
        }
    }

    #[must_use]
    pub fn from_shared(roots: Arc<EntryRootSet>) -> Self {
        Self { roots }
    }

    #[must_use]
    pub fn roots(&self) -> &EntryRootSet {
        &self.roots
    }

    /// Apply the rewrite rule to one request.
    ///
    /// The first root containing the request's directory wins. The derived
    /// request is anchored at that root with `./` prepended to the specifier;
    /// the context is carried over as is.
    #[must_use]
    pub fn decide<C: Clone>(&self, request: &ResolveRequest<C>) -> HookOutcome<C> {
        match self.roots.find_containing(&request.path) {
            Some(root) => HookOutcome::Rewritten(ResolveRequest {
                path: root.to_path_buf(),
                request: format!("./{}", request.request),
                context: request.context.clone(),
            }),
            None => HookOutcome::PassThrough,
        }
    }
}

impl<C: Clone> ModuleHook<C> for EntryRootInterceptor {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn module(&self, request: &ResolveRequest<C>) -> HookOutcome<C> {
        self.decide(request)
    }
}

/// Plugin anchoring bare imports inside entry directories to those directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveEntryModulesPlugin;

impl ResolveEntryModulesPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<C: Clone + 'static> Plugin<C> for ResolveEntryModulesPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn after_resolvers(
        &self,
        options: &BuildOptions,
        resolver: &dyn ModuleResolver,
        hooks: &mut ResolverHooks<C>,
    ) -> Result<(), Error> {
        let roots = compute_roots(&options.entry, &options.context, resolver)?;
        hooks.tap_module(Box::new(EntryRootInterceptor::new(roots)));
        Ok(())
    }
}
