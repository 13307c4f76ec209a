//! # Git Invocation Layer
//!
//! Thin wrapper over the system `git` binary. Using the system git means
//! SSH keys, credential helpers, and anything else configured in the
//! user's environment work without this tool knowing about them.
//!
//! Every method is a single blocking command invocation against a fixed
//! working directory. There is no process-wide `chdir` anywhere: a [`Git`]
//! handle carries its own directory and commands run there via
//! `Command::current_dir`, so failures in one operation can never leave
//! the process stranded in a submodule directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Outcome of a section removal from a config file.
///
/// Removing a section that is already gone means the target state is
/// achieved, so it is part of the normal result rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionRemoval {
    /// The section existed and was removed.
    Removed,
    /// No such section; nothing to do.
    AlreadyAbsent,
}

/// Pinned commit identity for convergent history.
///
/// When two operators independently stage the same tree on top of the same
/// parent and commit with this identity, the commit objects hash
/// identically and their histories converge. Applied only to commands that
/// explicitly opt in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEnv {
    pub name: String,
    pub email: String,
    pub date: String,
}

impl Default for CommitEnv {
    fn default() -> Self {
        CommitEnv {
            name: "mdm".to_string(),
            email: String::new(),
            date: "Jan 01 1970 00:00 -0000".to_string(),
        }
    }
}

impl CommitEnv {
    /// The author/committer environment variables this identity pins.
    pub fn variables(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("GIT_AUTHOR_NAME", self.name.as_str()),
            ("GIT_COMMITTER_NAME", self.name.as_str()),
            ("GIT_AUTHOR_EMAIL", self.email.as_str()),
            ("GIT_COMMITTER_EMAIL", self.email.as_str()),
            ("GIT_AUTHOR_DATE", self.date.as_str()),
            ("GIT_COMMITTER_DATE", self.date.as_str()),
        ]
    }
}

/// Handle for running git commands in one working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Git {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// A handle scoped to a subdirectory of this one.
    pub fn in_dir(&self, subdir: impl AsRef<Path>) -> Git {
        Git {
            workdir: self.workdir.join(subdir),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        self.run_with_env(args, &[])
    }

    fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Result<String> {
        log::debug!("git {} (in {})", args.join(" "), self.workdir.display());
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        for (key, value) in env {
            cmd.env(key, value);
        }
        let output = cmd.output()?;
        if !output.status.success() {
            return Err(Error::GitCommand {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Resolve the top of the enclosing working tree.
    pub fn rev_parse_toplevel(&self) -> Result<PathBuf> {
        match self.run(&["rev-parse", "--show-toplevel"]) {
            Ok(out) => Ok(PathBuf::from(out.trim())),
            Err(Error::GitCommand { stderr, .. }) => Err(Error::NoWorkTree { message: stderr }),
            Err(e) => Err(e),
        }
    }

    /// Commit id of `HEAD`, or `None` when there is no commit yet (a freshly
    /// initialized repository, or no repository at all).
    pub fn head_id(&self) -> Option<String> {
        self.run(&["rev-parse", "--verify", "HEAD"])
            .ok()
            .map(|out| out.trim().to_string())
    }

    /// Create an empty repository at `dir`. A no-op on an existing one,
    /// which is what makes the lifecycle operations re-runnable.
    pub fn init(&self, dir: &str) -> Result<()> {
        self.run(&["init", dir]).map(drop)
    }

    /// Register a submodule. A module already recorded in the index is
    /// accepted as the target state, so a retried add converges instead
    /// of failing here.
    pub fn submodule_add(&self, url: &str, name: &str) -> Result<()> {
        match self.run(&["submodule", "add", url, name]) {
            Ok(_) => Ok(()),
            Err(Error::GitCommand { stderr, .. })
                if stderr.contains("already exists in the index") =>
            {
                log::debug!("submodule {} already registered", name);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn submodule_init(&self, name: &str) -> Result<()> {
        self.run(&["submodule", "init", name]).map(drop)
    }

    /// Add a remote restricted to auto-fetching a single branch (`-t`).
    /// An already-configured remote by the same name is accepted as the
    /// target state only when it points at `url`; otherwise it is
    /// repointed, so a retry with a corrected url takes effect.
    pub fn ensure_remote_tracked(&self, remote: &str, url: &str, branch: &str) -> Result<()> {
        match self.run(&["remote", "add", "-t", branch, remote, url]) {
            Ok(_) => Ok(()),
            Err(Error::GitCommand { stderr, .. }) if stderr.contains("already exists") => {
                let current = self.run(&["remote", "get-url", remote])?;
                if current.trim() == url {
                    log::debug!("remote {} already configured", remote);
                    Ok(())
                } else {
                    log::debug!("remote {} repointed to {}", remote, url);
                    self.run(&["remote", "set-url", remote, url]).map(drop)
                }
            }
            Err(e) => Err(e),
        }
    }

    pub fn fetch(&self, remote: &str, refspec: &str) -> Result<()> {
        self.run(&["fetch", remote, refspec]).map(drop)
    }

    /// Create or reset `branch` at `commit` and check it out
    /// (`git checkout -B`). Unlike a fetch into the branch ref, this
    /// works when `branch` is the branch currently checked out.
    pub fn checkout_branch_at(&self, branch: &str, commit: &str) -> Result<()> {
        self.run(&["checkout", "-B", branch, commit]).map(drop)
    }

    /// Set a key in a specific config file (`git config -f`).
    pub fn config_file_set(&self, file: &str, key: &str, value: &str) -> Result<()> {
        self.run(&["config", "-f", file, key, value]).map(drop)
    }

    /// Remove a whole section from a specific config file. An absent
    /// section is reported, not raised.
    pub fn config_remove_section(&self, file: &str, section: &str) -> Result<SectionRemoval> {
        match self.run(&["config", "-f", file, "--remove-section", section]) {
            Ok(_) => Ok(SectionRemoval::Removed),
            Err(Error::GitCommand { stderr, .. })
                if stderr.to_lowercase().contains("no such section") =>
            {
                Ok(SectionRemoval::AlreadyAbsent)
            }
            Err(e) => Err(e),
        }
    }

    /// Stage paths into the index.
    pub fn stage(&self, paths: &[&str]) -> Result<()> {
        let mut args = vec!["add", "--"];
        args.extend_from_slice(paths);
        self.run(&args).map(drop)
    }

    /// Remove a path from the index only, leaving working-tree cleanup to
    /// the caller.
    pub fn rm_cached(&self, path: &str) -> Result<()> {
        self.run(&["rm", "--cached", path]).map(drop)
    }

    /// Raw `ls-files -s` output for `path`: the staged mode, object id,
    /// and stage number, or an empty string when nothing is staged there.
    pub fn ls_files_stage(&self, path: &str) -> Result<String> {
        self.run(&["ls-files", "-s", "--", path])
    }

    /// Raw `ls-remote` output for head refs matching `pattern` at `source`.
    pub fn ls_remote_heads(&self, source: &str, pattern: &str) -> Result<String> {
        self.run(&["ls-remote", "-h", source, pattern])
    }

    /// Commit whatever is staged. With a [`CommitEnv`] the author,
    /// committer, and timestamps are pinned so independently produced
    /// commits of the same tree converge.
    pub fn commit(&self, message: &str, env: Option<&CommitEnv>) -> Result<()> {
        let args = ["commit", "-m", message];
        match env {
            Some(identity) => self.run_with_env(&args, &identity.variables()).map(drop),
            None => self.run(&args).map(drop),
        }
    }
}
