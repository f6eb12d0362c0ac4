//! Host side of the resolution pipeline.
//!
//! [`ResolverPipeline`] plays the bundler: it owns the build options and the
//! module resolver, applies plugins once at setup, and routes every request
//! through the registered module hooks before falling back to its own
//! resolution.
//!
//! Module hooks only see bare specifiers, mirroring the module stage of a
//! node-style resolver: relative and absolute specifiers never reach them.
//! A rewritten request is resolved directly (the continuation). If that
//! fails, the pipeline carries on as if the hook had not produced a result.

use crate::config::BuildOptions;
use crate::error::Error;
use crate::plugin::{HookOutcome, Plugin, ResolveRequest, ResolverHooks};
use crate::resolver::{ModuleResolver, NodeResolver, ResolutionError};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What one module hook did with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HookStep {
    /// The hook passed the request on.
    PassThrough { hook: String },
    /// The hook derived a new request; `resolved` tells whether it resolved.
    Rewritten {
        hook: String,
        path: PathBuf,
        request: String,
        resolved: bool,
    },
}

/// Result of a traced resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveTrace {
    /// Resolved file.
    pub resolved: PathBuf,
    /// Hook that produced the result, if any.
    pub via: Option<String>,
    /// Hook decisions, in the order hooks ran.
    pub steps: Vec<HookStep>,
}

/// Module resolution with plugin hooks.
pub struct ResolverPipeline<C = ()> {
    options: BuildOptions,
    resolver: Arc<dyn ModuleResolver>,
    hooks: ResolverHooks<C>,
}

impl<C> ResolverPipeline<C> {
    /// Create a pipeline with no plugins applied.
    pub fn new(options: BuildOptions, resolver: impl ModuleResolver + 'static) -> Self {
        Self {
            options,
            resolver: Arc::new(resolver),
            hooks: ResolverHooks::new(),
        }
    }

    /// Create a pipeline using [`NodeResolver`] with the build's extensions.
    #[must_use]
    pub fn with_node_resolver(options: BuildOptions) -> Self {
        let resolver = NodeResolver::from_options(&options);
        Self::new(options, resolver)
    }

    #[must_use]
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    #[must_use]
    pub fn resolver(&self) -> &dyn ModuleResolver {
        self.resolver.as_ref()
    }

    /// Number of registered module hooks.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Apply a plugin.
    ///
    /// Hooks the plugin taps are installed only when its setup succeeds, so a
    /// failing plugin leaves the pipeline as it was.
    pub fn apply(&mut self, plugin: &dyn Plugin<C>) -> Result<(), Error> {
        let mut staged = ResolverHooks::new();
        plugin.after_resolvers(&self.options, self.resolver.as_ref(), &mut staged)?;
        self.hooks.append(staged);
        Ok(())
    }
}

impl<C: Clone> ResolverPipeline<C> {
    /// Resolve a request to a file.
    pub fn resolve(&self, request: &ResolveRequest<C>) -> Result<PathBuf, ResolutionError> {
        self.resolve_traced(request).map(|trace| trace.resolved)
    }

    /// Resolve a request and record what each hook did.
    pub fn resolve_traced(
        &self,
        request: &ResolveRequest<C>,
    ) -> Result<ResolveTrace, ResolutionError> {
        let mut steps = Vec::new();

        if is_module_request(&request.request) {
            for hook in self.hooks.module_hooks() {
                match hook.module(request) {
                    HookOutcome::PassThrough => steps.push(HookStep::PassThrough {
                        hook: hook.name().to_string(),
                    }),
                    HookOutcome::Rewritten(derived) => {
                        let result = self.resolver.resolve(&derived.path, &derived.request);
                        steps.push(HookStep::Rewritten {
                            hook: hook.name().to_string(),
                            path: derived.path,
                            request: derived.request,
                            resolved: result.is_ok(),
                        });
                        if let Ok(resolved) = result {
                            return Ok(ResolveTrace {
                                resolved,
                                via: Some(hook.name().to_string()),
                                steps,
                            });
                        }
                    }
                }
            }
        }

        let resolved = self.resolver.resolve(&request.path, &request.request)?;
        Ok(ResolveTrace {
            resolved,
            via: None,
            steps,
        })
    }
}

impl<C: Clone + Send + Sync> ResolverPipeline<C> {
    /// Resolve many independent requests in parallel.
    ///
    /// Results are returned in the order of `requests`.
    pub fn resolve_all(
        &self,
        requests: &[ResolveRequest<C>],
    ) -> Vec<Result<PathBuf, ResolutionError>> {
        requests.par_iter().map(|req| self.resolve(req)).collect()
    }
}

/// Bare specifiers reach module hooks; relative and absolute ones do not.
fn is_module_request(spec: &str) -> bool {
    !(spec.is_empty()
        || spec == "."
        || spec == ".."
        || spec.starts_with("./")
        || spec.starts_with("../")
        || Path::new(spec).is_absolute())
}
