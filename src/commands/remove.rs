//! # Remove Command Implementation
//!
//! This module implements the `remove` subcommand, which deletes all
//! traces of a dependency: its `.gitmodules` section, its index entry,
//! its working-tree directory, its repository under `.git/modules`, and
//! its section in the local `.git/config`.
//!
//! Manifest sections, config sections, and directories that are already
//! gone are treated as the target state. The index entry is the one
//! piece that must exist: removing a name that was never added fails.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

use mdm::git::CommitEnv;

/// Remove all traces of a dependency
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Name of the dependency to remove.
    pub name: String,

    /// Commit the staged changes under the pinned mdm identity.
    #[arg(long)]
    pub commit: bool,

    /// Operate on the repository containing this directory instead of the
    /// current one.
    #[arg(long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,
}

/// Execute the `remove` command.
pub fn execute(args: RemoveArgs) -> Result<()> {
    let workspace = super::workspace(args.working_dir.as_deref())?;

    workspace.remove(&args.name)?;

    if args.commit {
        let message = format!("mdm: remove dependency {}", args.name);
        workspace.commit_staged(&message, Some(&CommitEnv::default()))?;
        println!(
            "{} removed and committed {}",
            style("✅").green(),
            args.name
        );
    } else {
        println!(
            "{} removed {} (staged; commit when ready)",
            style("✅").green(),
            args.name
        );
    }
    Ok(())
}
