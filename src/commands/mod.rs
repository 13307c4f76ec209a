//! # CLI Command Implementations
//!
//! One module per subcommand of the `mdm` command-line tool.
//!
//! Each command module contains an `Args` struct defining the
//! command-specific arguments (derived with `clap`) and an `execute`
//! function that performs the command's logic by calling into the `mdm`
//! library.

pub mod add;
pub mod completions;
pub mod load;
pub mod ls;
pub mod remove;
pub mod update;
pub mod versions;

use std::path::Path;

use anyhow::Result;
use mdm::lifecycle::Workspace;

/// Resolve the workspace for a command, from `--working-dir` or the
/// current directory.
fn workspace(working_dir: Option<&Path>) -> Result<Workspace> {
    let dir = match working_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    Ok(Workspace::discover(&dir)?)
}
