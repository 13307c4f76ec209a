//! # Versions Command Implementation
//!
//! This module implements the `versions` subcommand, which lists the
//! release versions a source publishes, oldest first. The source may be a
//! local path or any transport URL git supports.
//!
//! A reachable source publishing nothing is a normal outcome; a source
//! that cannot be queried is an error with a non-zero exit status.

use anyhow::Result;
use clap::Args;

use mdm::git::Git;
use mdm::release;

/// List the release versions a source publishes
#[derive(Args, Debug)]
pub struct VersionsArgs {
    /// Local path or URL of the release source.
    pub source: String,
}

/// Execute the `versions` command.
pub fn execute(args: VersionsArgs) -> Result<()> {
    let git = Git::new(std::env::current_dir()?);
    let versions = release::resolve_versions(&git, &args.source)?;

    if versions.is_empty() {
        println!("no releases published at {}", args.source);
        return Ok(());
    }
    for version in versions {
        println!("{}", version);
    }
    Ok(())
}
