//! Nyo CLI - declarative deployment orchestrator
//!
//! Usage: nyo <COMMAND>
//!
//! Commands:
//!   deploy  Deploy the project described by ./Nyo.toml
//!
//! Running without a command prints usage and exits with status 1.
//! Errors are printed to stdout and exit with status 1. Logs go to stderr,
//! filtered by `NYO_LOG` (default `info`).

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
            _ => {
                println!("{err}");
                return ExitCode::FAILURE;
            }
        },
    };

    let result = match cli.command {
        Some(Commands::Deploy) => run_deploy().await,
        None => {
            println!("{}", Cli::command().render_help());
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_deploy() -> Result<()> {
    let working_dir = std::env::current_dir().context("failed to get current directory")?;
    commands::deploy::cmd_deploy(&working_dir).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NYO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
