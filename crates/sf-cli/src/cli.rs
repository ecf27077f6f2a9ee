//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Semflow - semver-ordered schema migrations against a pluggable backend
#[derive(Parser, Debug)]
#[command(name = "sf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Version presumed already present in the initial state; `check`
    /// reports it as not migratable
    #[arg(long, global = true, env = "SEMFLOW_BOOTSTRAP_VERSION")]
    pub bootstrap_version: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new Semflow project
    Init(InitArgs),

    /// Migrate the configured database up to a target version
    Up(UpArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),

    /// Check whether a version has an executable up migration on disk
    Check(CheckArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name (directory to create)
    pub name: String,

    /// Database path recorded in semflow.yml
    #[arg(long, default_value = "./semflow.duckdb")]
    pub database_path: String,
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Target version to migrate to
    pub version: String,

    /// Option passed through to migration scripts (KEY=VALUE, repeatable);
    /// overrides `vars` from semflow.yml
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Also show the pending set for this target version
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Version to check
    pub version: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
