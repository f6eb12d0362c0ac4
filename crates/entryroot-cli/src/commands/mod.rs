//! Subcommand implementations.

pub mod entries;
pub mod resolve;
pub mod roots;
pub mod version;

use entryroot_core::config::{find_config_file, load_build_options};
use entryroot_core::{BuildOptions, Error};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::Path;

/// Error object in JSON output.
#[derive(Serialize)]
pub struct ErrorJson {
    pub code: String,
    pub message: String,
}

/// Load build options from `--config`, or from `entryroot.config.json` in `cwd`.
pub fn load_options(cwd: &Path, config: Option<&Path>) -> Result<BuildOptions, Error> {
    let path = match config {
        Some(p) => entryroot_util::path::absolutize(p, cwd),
        None => find_config_file(cwd).ok_or_else(|| Error::ConfigNotFound {
            dir: cwd.to_path_buf(),
        })?,
    };
    tracing::debug!(config = %path.display(), "loading build options");
    load_build_options(&path)
}

/// Report a failure and exit.
///
/// In JSON mode the error goes to stdout as `{"ok":false,"error":{...}}` and
/// the process exits with status 1. Otherwise it is returned as a diagnostic.
pub fn fail(
    code: &str,
    err: impl std::error::Error + Send + Sync + 'static,
    json: bool,
) -> Result<()> {
    if json {
        let out = serde_json::json!({
            "ok": false,
            "error": ErrorJson {
                code: code.to_string(),
                message: err.to_string(),
            }
        });
        println!("{out}");
        std::process::exit(1);
    }
    Err(err).into_diagnostic()
}
