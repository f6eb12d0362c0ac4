#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use entryroot_core::Config;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "entryroot")]
#[command(author, version, about = "Inspect entry roots and how bare imports resolve", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Path to config file (defaults to entryroot.config.json in the working directory)
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Print the normalized entry map
    Entries,

    /// Print the entry root directories in match order
    Roots,

    /// Resolve a specifier with entry roots applied and explain the result
    Resolve {
        /// Module specifier to resolve (e.g. "utils" or "./utils")
        specifier: String,

        /// Directory the import originates from (defaults to the working directory)
        #[arg(long, value_name = "DIR")]
        from: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory; a relative --cwd is taken from the process cwd
    let process_cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let cwd = match cli.cwd {
        Some(dir) => entryroot_util::path::absolutize(&dir, &process_cwd),
        None => process_cwd,
    };

    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    // Logs go to stderr, so JSON on stdout stays clean
    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Entries) => {
            let span = tracing::info_span!("entries", cmd = "entries", cwd = %cwd.display());
            let _guard = span.enter();
            commands::entries::run(&cwd, cli.config.as_deref(), cli.json)
        }
        Some(Commands::Roots) => {
            let span = tracing::info_span!("roots", cmd = "roots", cwd = %cwd.display());
            let _guard = span.enter();
            commands::roots::run(&cwd, cli.config.as_deref(), cli.json)
        }
        Some(Commands::Resolve { specifier, from }) => {
            let span = tracing::info_span!("resolve", cmd = "resolve", cwd = %cwd.display());
            let _guard = span.enter();
            let action = commands::resolve::ResolveAction {
                cwd: cwd.clone(),
                config: cli.config,
                specifier,
                from,
            };
            commands::resolve::run(action, cli.json)
        }
    }
}
