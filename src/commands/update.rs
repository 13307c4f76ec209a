//! # Update Command Implementation
//!
//! This module implements the `update` subcommand, which walks every
//! managed dependency in the manifest and re-fetches it to its pinned
//! `mdm-version`. The usual occasion is a fresh checkout of the parent
//! repository, where the submodule directories exist but are empty.
//!
//! Modules are processed one at a time; a failing module is recorded and
//! the walk continues. The summary reports which modules changed, which
//! were already in place, and which failed, and any failure makes the
//! command exit non-zero.

use anyhow::Result;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Re-fetch every managed dependency to its pinned release
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Operate on the repository containing this directory instead of the
    /// current one.
    #[arg(long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,
}

/// Execute the `update` command.
pub fn execute(args: UpdateArgs) -> Result<()> {
    let workspace = super::workspace(args.working_dir.as_deref())?;

    let bar = ProgressBar::new(0);
    bar.set_style(ProgressStyle::with_template(
        "updating module {pos}/{len}: {msg}",
    )?);
    let summary = workspace.update_all(|index, total, name| {
        bar.set_length(total as u64);
        bar.set_position(index as u64);
        bar.set_message(name.to_string());
    })?;
    bar.finish_and_clear();

    if summary.total() == 0 {
        println!("no managed dependencies to update");
        return Ok(());
    }

    println!(
        "dependencies updated ({} changed, {} unaffected{})",
        summary.changed.len(),
        summary.unaffected.len(),
        if summary.failed.is_empty() {
            String::new()
        } else {
            format!(", {} failed", summary.failed.len())
        }
    );
    for name in &summary.changed {
        println!("  changed: {}", name);
    }
    for (name, error) in &summary.failed {
        println!("  {} {}: {}", style("failed:").red(), name, error);
    }

    if !summary.failed.is_empty() {
        anyhow::bail!("{} module(s) failed to update", summary.failed.len());
    }
    Ok(())
}
