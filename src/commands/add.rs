//! # Add Command Implementation
//!
//! This module implements the `add` subcommand, which registers a new
//! dependency submodule and fetches its released content.
//!
//! ## Functionality
//!
//! - Registers `<name>` as a submodule of `<url>` without cloning it.
//! - Fetches exactly the `mdm/release/<version>` branch and checks it out.
//! - Writes the `mdm`, `mdm-version`, and `update = none` markers into
//!   `.gitmodules` and stages both the module and the manifest.
//! - With `--commit`, commits the staged result under the pinned mdm
//!   identity so independent operators converge to the same commit hash.
//!
//! If a step fails, everything already done stays in place; re-running
//! the same `add` resumes toward the target state.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

use mdm::git::CommitEnv;

/// Add a dependency at a released version
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Name of the dependency; doubles as its submodule path.
    pub name: String,

    /// URL of the repository publishing the dependency's releases.
    pub url: String,

    /// Release version to fetch (the suffix of an `mdm/release/*` branch).
    pub version: String,

    /// Commit the staged changes under the pinned mdm identity.
    #[arg(long)]
    pub commit: bool,

    /// Operate on the repository containing this directory instead of the
    /// current one.
    #[arg(long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,
}

/// Execute the `add` command.
pub fn execute(args: AddArgs) -> Result<()> {
    let workspace = super::workspace(args.working_dir.as_deref())?;

    workspace.add(&args.name, &args.url, &args.version)?;

    if args.commit {
        let message = format!("mdm: add dependency {} v{}", args.name, args.version);
        workspace.commit_staged(&message, Some(&CommitEnv::default()))?;
        println!(
            "{} added and committed {} at version {}",
            style("✅").green(),
            args.name,
            args.version
        );
    } else {
        println!(
            "{} added {} at version {} (staged; commit when ready)",
            style("✅").green(),
            args.name,
            args.version
        );
    }
    Ok(())
}
