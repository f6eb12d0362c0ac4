//! Build options and runtime configuration.
//!
//! Build options are what the host bundler hands to plugins: the entry
//! declaration, the context directory entries are resolved from, and the
//! extensions its resolver probes. They can be loaded from
//! `entryroot.config.json`:
//!
//! ```json
//! {
//!   "entry": { "main": "./src/index.js", "admin": ["./admin/a.js", "./admin/b.js"] },
//!   "context": ".",
//!   "extensions": [".js", ".ts"]
//! }
//! ```

use crate::entry::EntryConfig;
use crate::error::Error;
use crate::resolver::DEFAULT_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name looked up in the working directory.
pub const CONFIG_FILE: &str = "entryroot.config.json";

/// Build options supplied by the host.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Entry declaration.
    pub entry: EntryConfig,
    /// Absolute directory entries are resolved from.
    pub context: PathBuf,
    /// Extensions to probe (in order).
    pub extensions: Vec<String>,
}

impl BuildOptions {
    /// Create build options with the default extension list.
    #[must_use]
    pub fn new(entry: EntryConfig, context: impl Into<PathBuf>) -> Self {
        Self {
            entry,
            context: context.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Override the extension list.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

/// On-disk shape of `entryroot.config.json`.
#[derive(Debug, Deserialize)]
struct RawBuildOptions {
    entry: serde_json::Value,
    #[serde(default)]
    context: Option<PathBuf>,
    #[serde(default)]
    extensions: Option<Vec<String>>,
}

/// Find `entryroot.config.json` in `dir`.
#[must_use]
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Load build options from a config file.
///
/// `context` defaults to the directory holding the config file and is
/// resolved against it when relative. The entry value is converted with
/// [`EntryConfig::from_value`]; shape errors are reported later, by
/// normalization.
pub fn load_build_options(path: &Path) -> Result<BuildOptions, Error> {
    let source =
        entryroot_util::fs::read_to_string_lossy(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
    parse_build_options(&source, path)
}

/// Parse build options from config source text. `path` names the file for
/// errors and anchors a relative `context`.
pub fn parse_build_options(source: &str, path: &Path) -> Result<BuildOptions, Error> {
    let raw: RawBuildOptions =
        serde_json::from_str(source).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let context = match raw.context {
        Some(ctx) => entryroot_util::path::absolutize(&ctx, config_dir),
        None => config_dir.to_path_buf(),
    };

    let mut options = BuildOptions::new(EntryConfig::from_value(raw.entry), context);
    if let Some(extensions) = raw.extensions {
        options = options.with_extensions(extensions);
    }
    Ok(options)
}

/// Runtime configuration for the entryroot CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}
