//! Semflow CLI - semver-ordered schema migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{check, init, status, up};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Init(args) => init::execute(args).await,
        cli::Commands::Up(args) => up::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Check(args) => check::execute(args, &cli.global).await,
    }
}
