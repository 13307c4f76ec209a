//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// mdm - manage released dependencies as narrowly-fetched git submodules
#[derive(Parser, Debug)]
#[command(name = "mdm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a dependency at a released version
    Add(commands::add::AddArgs),

    /// Re-fetch an already-registered dependency's content
    Load(commands::load::LoadArgs),

    /// Remove all traces of a dependency
    Remove(commands::remove::RemoveArgs),

    /// List managed dependencies from the submodules manifest
    #[command(visible_alias = "list")]
    Ls(commands::ls::LsArgs),

    /// List the release versions a source publishes
    Versions(commands::versions::VersionsArgs),

    /// Re-fetch every managed dependency to its pinned release
    Update(commands::update::UpdateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();

        match self.command {
            Commands::Add(args) => commands::add::execute(args),
            Commands::Load(args) => commands::load::execute(args),
            Commands::Remove(args) => commands::remove::execute(args),
            Commands::Ls(args) => commands::ls::execute(args),
            Commands::Versions(args) => commands::versions::execute(args),
            Commands::Update(args) => commands::update::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
