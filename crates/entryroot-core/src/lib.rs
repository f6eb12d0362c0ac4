#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Entry-local module resolution for bundlers.
//!
//! Bare imports written inside the directory of an entry module resolve
//! relative to that directory. The pieces, in setup order:
//!
//! - [`entry`]: flatten an entry declaration of any supported shape
//! - [`roots`]: turn entry specifiers into ordered, deduplicated directories
//! - [`interceptor`]: the module hook that anchors requests to those roots
//! - [`pipeline`]: a host pipeline that applies plugins and runs hooks

pub mod config;
pub mod entry;
pub mod error;
pub mod interceptor;
pub mod pipeline;
pub mod plugin;
pub mod resolver;
pub mod roots;
pub mod version;

pub use config::{load_build_options, BuildOptions, Config};
pub use entry::{normalize, EntryConfig, EntryValue, NormalizedEntryMap};
pub use error::{ConfigError, Error};
pub use interceptor::{EntryRootInterceptor, ResolveEntryModulesPlugin};
pub use pipeline::{HookStep, ResolveTrace, ResolverPipeline};
pub use plugin::{HookOutcome, ModuleHook, Plugin, ResolveRequest, ResolverHooks};
pub use resolver::{ModuleResolver, NodeResolver, ResolutionError, ResolveReasonCode};
pub use roots::{compute_roots, EntryRootSet};
pub use version::VERSION;
