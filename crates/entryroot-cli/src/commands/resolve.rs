//! `entryroot resolve` command implementation.
//!
//! Runs one module request through a pipeline with the entry-root plugin
//! applied and explains the result.

use super::{fail, load_options};
use entryroot_core::version::OUTPUT_SCHEMA_VERSION;
use entryroot_core::{
    HookStep, ResolveEntryModulesPlugin, ResolveRequest, ResolveTrace, ResolverPipeline,
};
use miette::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Resolve command action.
#[derive(Debug, Clone)]
pub struct ResolveAction {
    /// Working directory.
    pub cwd: PathBuf,
    /// Explicit config file.
    pub config: Option<PathBuf>,
    /// Specifier to resolve.
    pub specifier: String,
    /// Directory the request originates from (defaults to cwd).
    pub from: Option<PathBuf>,
}

#[derive(Serialize)]
struct RequestJson<'a> {
    path: &'a Path,
    request: &'a str,
}

#[derive(Serialize)]
struct ResolveJson<'a> {
    ok: bool,
    schema_version: u32,
    request: RequestJson<'a>,
    #[serde(flatten)]
    trace: &'a ResolveTrace,
}

/// Run the resolve command.
pub fn run(action: ResolveAction, json: bool) -> Result<()> {
    let options = match load_options(&action.cwd, action.config.as_deref()) {
        Ok(options) => options,
        Err(e) => return fail(e.code(), e, json),
    };

    let mut pipeline = ResolverPipeline::<()>::with_node_resolver(options);
    if let Err(e) = pipeline.apply(&ResolveEntryModulesPlugin::new()) {
        return fail(e.code(), e, json);
    }

    let from = match &action.from {
        Some(dir) => entryroot_util::path::absolutize(dir, &action.cwd),
        None => action.cwd.clone(),
    };
    let request = ResolveRequest::new(from, action.specifier.as_str(), ());

    let trace = match pipeline.resolve_traced(&request) {
        Ok(trace) => trace,
        Err(e) => {
            let code = e.reason.to_string();
            return fail(&code, e, json);
        }
    };

    for step in &trace.steps {
        tracing::debug!(?step, "module hook");
    }

    if json {
        let out = ResolveJson {
            ok: true,
            schema_version: OUTPUT_SCHEMA_VERSION,
            request: RequestJson {
                path: &request.path,
                request: &request.request,
            },
            trace: &trace,
        };
        println!("{}", serde_json::to_string(&out).unwrap_or_default());
    } else {
        print_human(&request, &trace);
    }

    Ok(())
}

fn print_human(request: &ResolveRequest<()>, trace: &ResolveTrace) {
    println!("request: {} from {}", request.request, request.path.display());
    for step in &trace.steps {
        match step {
            HookStep::PassThrough { hook } => println!("  [{hook}] pass"),
            HookStep::Rewritten {
                hook,
                path,
                request,
                resolved,
            } => {
                let status = if *resolved { "resolved" } else { "not found" };
                println!(
                    "  [{hook}] rewrite -> {request} from {} ({status})",
                    path.display()
                );
            }
        }
    }
    println!("resolved: {}", trace.resolved.display());
}
