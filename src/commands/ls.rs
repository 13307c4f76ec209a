//! # Ls Command Implementation
//!
//! This module implements the `ls` subcommand, which lists the managed
//! dependencies recorded in the submodules manifest.
//!
//! ## Functionality
//!
//! - **Listing**: shows every submodule carrying the `mdm` marker, with
//!   its pinned version and URL.
//! - **Filtering**: `--kind` restricts to one marker kind, `--name` looks
//!   up a single entry.
//! - **JSON output**: `--json` emits the entries as a JSON object for
//!   scripting.
//!
//! A miss (no manifest, no managed entries, unknown name) is a normal
//! outcome reported on stdout with a zero exit status; only manifest
//! resolution and parse failures are errors.
//!
//! This command is a safe, read-only operation that does not modify any
//! files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use mdm::git::Git;
use mdm::gitmodules::{Listing, Manifest, Submodule};

/// List managed dependencies from the submodules manifest
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Only list modules of this marker kind (e.g. "dependency").
    #[arg(long, value_name = "KIND")]
    pub kind: Option<String>,

    /// Look up a single module by name.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Read this manifest file instead of resolving the enclosing working
    /// tree's `.gitmodules`.
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Emit JSON instead of the human-readable listing.
    #[arg(long)]
    pub json: bool,

    /// Operate on the repository containing this directory instead of the
    /// current one.
    #[arg(long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,
}

/// Execute the `ls` command.
pub fn execute(args: LsArgs) -> Result<()> {
    let manifest = match &args.file {
        Some(path) => Manifest::load(path)?,
        None => {
            let dir = match &args.working_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()?,
            };
            Manifest::load_default(&Git::new(dir))?
        }
    };

    let Some(manifest) = manifest else {
        report_miss(args.json, "no submodules manifest present")?;
        return Ok(());
    };

    if let Some(name) = &args.name {
        match manifest.managed_by_name(name, args.kind.as_deref()) {
            Some(entry) => print_one(args.json, name, entry)?,
            None => report_miss(args.json, &format!("no managed module named {}", name))?,
        }
        return Ok(());
    }

    match manifest.managed(args.kind.as_deref()) {
        Listing::NoneManaged => report_miss(args.json, "no managed modules")?,
        Listing::Managed(modules) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&modules)?);
            } else {
                for (name, entry) in &modules {
                    print_line(name, entry);
                }
            }
        }
    }
    Ok(())
}

fn print_one(json: bool, name: &str, entry: &Submodule) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        print_line(name, entry);
    }
    Ok(())
}

fn print_line(name: &str, entry: &Submodule) {
    println!(
        "{}\t{}\t{}",
        name,
        entry.version().unwrap_or("-"),
        entry.url().unwrap_or("-")
    );
}

/// A miss is a normal outcome: empty JSON object for scripts, a note for
/// humans, exit status zero either way.
fn report_miss(json: bool, message: &str) -> Result<()> {
    if json {
        println!("{{}}");
    } else {
        println!("{}", message);
    }
    Ok(())
}
