//! `entryroot roots` command implementation.
//!
//! Resolves every entry of a build and prints the entry root directories in
//! match order.

use super::{fail, load_options};
use entryroot_core::version::OUTPUT_SCHEMA_VERSION;
use entryroot_core::{compute_roots, NodeResolver};
use miette::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct RootsJson<'a> {
    ok: bool,
    schema_version: u32,
    context: &'a Path,
    roots: &'a [PathBuf],
}

/// Run the roots command.
pub fn run(cwd: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let options = match load_options(cwd, config) {
        Ok(options) => options,
        Err(e) => return fail(e.code(), e, json),
    };

    let resolver = NodeResolver::from_options(&options);
    let roots = match compute_roots(&options.entry, &options.context, &resolver) {
        Ok(roots) => roots,
        Err(e) => return fail(e.code(), e, json),
    };

    for (i, root) in roots.iter().enumerate() {
        tracing::debug!(index = i, root = %root.display(), "entry root");
    }

    if json {
        let out = RootsJson {
            ok: true,
            schema_version: OUTPUT_SCHEMA_VERSION,
            context: &options.context,
            roots: roots.as_slice(),
        };
        println!("{}", serde_json::to_string(&out).unwrap_or_default());
    } else if roots.is_empty() {
        println!("No entry roots.");
    } else {
        for root in roots.iter() {
            println!("{}", root.display());
        }
    }

    Ok(())
}
