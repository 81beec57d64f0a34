use clap::{Parser, Subcommand};

/// Nyo - declarative deployment orchestrator
#[derive(Parser, Debug)]
#[command(name = "nyo")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'nyo deploy' in a directory containing Nyo.toml.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Deploy the project described by ./Nyo.toml
    Deploy,
}
