#![deny(missing_docs)]

//! # Xano Docs CLI
//!
//! Command Line Interface for the Xano documentation toolchain.
//!
//! Supported Commands:
//! - `repo`: Workspace export -> documentation file tree.
//! - `oas`: Raw OpenAPI -> enriched OpenAPI 3.1 + HTML reference page.

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod config;
mod error;
#[cfg(feature = "client")]
mod fetcher;
mod html;
mod oas;
mod repo;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Xano documentation toolchain")]
struct Cli {
    /// Log debug output (overridden by `RUST_LOG`).
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a workspace export as a documentation tree.
    Repo(repo::RepoArgs),
    /// Enrich a raw OpenAPI document.
    Oas(oas::OasArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Repo(args) => repo::execute(args)?,
        Commands::Oas(args) => oas::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_repo_command() {
        let cli = Cli::try_parse_from([
            "xano-docs", "repo", "--export", "export.json", "--out", "docs", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Repo(args) => {
                assert_eq!(args.out, std::path::PathBuf::from("docs"));
                assert!(!args.keep_existing);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
