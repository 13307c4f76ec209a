//! # Load Command Implementation
//!
//! This module implements the `load` subcommand, which re-establishes the
//! content of a dependency that is already registered in `.gitmodules`,
//! e.g. after a fresh checkout of the parent repository leaves the
//! submodule directory empty.
//!
//! Unlike `add`, nothing is written to the manifest and nothing is
//! staged. The `url` argument is only needed when the module's restricted
//! `origin` remote has not been configured yet; after an `add` (or a
//! previous `load` with a url) it can be omitted.

use anyhow::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

/// Re-fetch an already-registered dependency's content
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Name of the dependency; doubles as its submodule path.
    pub name: String,

    /// Release version to fetch.
    pub version: String,

    /// Remote URL, if the module's `origin` is not configured yet.
    pub url: Option<String>,

    /// Operate on the repository containing this directory instead of the
    /// current one.
    #[arg(long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,
}

/// Execute the `load` command.
pub fn execute(args: LoadArgs) -> Result<()> {
    let workspace = super::workspace(args.working_dir.as_deref())?;

    workspace.load(&args.name, &args.version, args.url.as_deref())?;

    println!(
        "{} loaded {} at version {}",
        style("✅").green(),
        args.name,
        args.version
    );
    Ok(())
}
