mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use autolinks::diagnostics;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands::Output;

#[derive(Parser)]
#[command(
    name = "autolinks",
    about = "Rewrite bare filename links in markdown to paths relative to each page"
)]
struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Log indexing and per-file progress.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every indexed filename with its candidate paths
    Index {
        /// Docs directory to index (default: `docs_dir` from .autolinks.toml, else `docs`)
        #[arg(long)]
        docs_dir: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rewrite links in every markdown document under the docs directory
    Rewrite {
        /// Exit 1 if any document would change; write nothing
        #[arg(long, conflicts_with = "out")]
        check: bool,
        /// Docs directory to rewrite (default: `docs_dir` from .autolinks.toml, else `docs`)
        #[arg(long)]
        docs_dir: Option<PathBuf>,
        /// Write rewritten documents under this directory instead of in place
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Index { docs_dir, json } => {
            commands::index(docs_dir, json).map(|()| ExitCode::SUCCESS)
        },
        Commands::Rewrite { check, docs_dir, out } => {
            let output = match (check, out) {
                (true, _) => Output::Check,
                (false, Some(dir)) => Output::Mirror(dir),
                (false, None) => Output::InPlace,
            };
            commands::rewrite(docs_dir, &output)
        },
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    }
}
