//! `entryroot entries` command implementation.
//!
//! Prints the normalized entry map of a build.

use super::{fail, load_options};
use entryroot_core::version::OUTPUT_SCHEMA_VERSION;
use entryroot_core::{normalize, Error, NormalizedEntryMap};
use miette::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct EntriesJson<'a> {
    ok: bool,
    schema_version: u32,
    entries: &'a NormalizedEntryMap,
}

/// Run the entries command.
pub fn run(cwd: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let options = match load_options(cwd, config) {
        Ok(options) => options,
        Err(e) => return fail(e.code(), e, json),
    };

    let entries = match normalize(&options.entry) {
        Ok(entries) => entries,
        Err(e) => {
            let e = Error::from(e);
            return fail(e.code(), e, json);
        }
    };
    tracing::debug!(count = entries.len(), "normalized entries");

    if json {
        let out = EntriesJson {
            ok: true,
            schema_version: OUTPUT_SCHEMA_VERSION,
            entries: &entries,
        };
        println!("{}", serde_json::to_string(&out).unwrap_or_default());
    } else {
        for (name, specifier) in entries.iter() {
            if name == specifier {
                println!("{specifier}");
            } else {
                println!("{name}: {specifier}");
            }
        }
    }

    Ok(())
}
