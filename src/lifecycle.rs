//! # Dependency Lifecycle Operations
//!
//! The state-changing protocols: add, load, fetch (internal), remove, and
//! the bulk update built on load. Each operation is an ordered sequence of
//! synchronous git commands; a failing step aborts the operation and
//! surfaces to the caller with whatever steps already completed left in
//! place. There is no compensating rollback. Instead, every step is
//! re-runnable (init on an existing repository is a no-op, the restricted
//! remote tolerates being present, directory deletion tolerates absence),
//! so a failed operation is repaired by running it again.
//!
//! The content protocol never clones. A dependency starts as an empty
//! repository shell, gains an `origin` remote restricted to the `mdm/init`
//! branch, and then fetches exactly one release branch,
//! `mdm/release/<version>`, mapped to a same-named local branch and
//! checked out. Bulk git commands against the parent repository therefore
//! cannot pull unbounded history through a dependency.

use std::fs;
use std::path::Path;

use crate::defaults::{
    release_branch, submodule_section, GITMODULES, INIT_BRANCH, KIND_DEPENDENCY, MDM_KEY,
    MDM_VERSION_KEY,
};
use crate::error::{Error, Result};
use crate::git::{CommitEnv, Git, SectionRemoval};
use crate::gitmodules::{Listing, Manifest, Submodule};

/// A parent repository's working tree, anchored at its top level.
#[derive(Debug, Clone)]
pub struct Workspace {
    git: Git,
}

/// Accounting for a bulk update pass.
#[derive(Debug, Default)]
pub struct UpdateSummary {
    /// Modules whose checked-out commit moved.
    pub changed: Vec<String>,
    /// Modules already at their pinned release.
    pub unaffected: Vec<String>,
    /// Modules whose update failed, with the failure.
    pub failed: Vec<(String, Error)>,
}

impl UpdateSummary {
    pub fn total(&self) -> usize {
        self.changed.len() + self.unaffected.len() + self.failed.len()
    }
}

impl Workspace {
    /// Resolve the working tree enclosing `dir`.
    pub fn discover(dir: &Path) -> Result<Workspace> {
        let toplevel = Git::new(dir).rev_parse_toplevel()?;
        Ok(Workspace {
            git: Git::new(toplevel),
        })
    }

    pub fn root(&self) -> &Path {
        self.git.workdir()
    }

    pub fn git(&self) -> &Git {
        &self.git
    }

    /// The manifest of this working tree, if one exists yet.
    pub fn manifest(&self) -> Result<Option<Manifest>> {
        Manifest::load(&self.root().join(GITMODULES))
    }

    /// Add a dependency: register `name` as a submodule of `url`, fetch
    /// release `version` into it, mark it managed, and stage everything.
    pub fn add(&self, name: &str, url: &str, version: &str) -> Result<()> {
        log::info!("adding dependency {} = {} @ {}", name, url, version);

        // An empty repository shell first, filled by a narrow fetch.
        // Content must exist before the submodule is registered: git
        // refuses to stage a module with no commit checked out, and with
        // content already present `submodule add` registers the module
        // without cloning.
        self.git.init(name)?;
        let module = self.git.in_dir(name);
        module.ensure_remote_tracked("origin", url, INIT_BRANCH)?;
        fetch_release(&module, version)?;

        self.git.submodule_add(url, name)?;
        // `submodule add` does not always leave the module initialized;
        // at worst this repeats a no-op.
        self.git.submodule_init(name)?;

        let section = submodule_section(name);
        self.git.config_file_set(
            GITMODULES,
            &format!("{}.{}", section, MDM_KEY),
            KIND_DEPENDENCY,
        )?;
        self.git.config_file_set(
            GITMODULES,
            &format!("{}.{}", section, MDM_VERSION_KEY),
            version,
        )?;
        // Bulk submodule commands would otherwise drag far too much data
        // through a dependency; tell them to skip it.
        self.git
            .config_file_set(GITMODULES, &format!("{}.update", section), "none")?;

        // The markers postdate whatever `submodule add` staged, so stage
        // the manifest again along with the module.
        self.git.stage(&[name, GITMODULES])?;
        Ok(())
    }

    /// Re-establish a dependency's content without re-registering it,
    /// e.g. after a fresh checkout of the parent repository. When `url`
    /// is absent the module's remote must already be configured.
    pub fn load(&self, name: &str, version: &str, url: Option<&str>) -> Result<()> {
        log::info!("loading dependency {} @ {}", name, version);
        self.git.init(name)?;
        let module = self.git.in_dir(name);
        if let Some(url) = url {
            module.ensure_remote_tracked("origin", url, INIT_BRANCH)?;
        }
        fetch_release(&module, version)
    }

    /// Remove all traces of a dependency: its manifest section, its index
    /// entry, its working tree, its metadata under `.git/modules`, and its
    /// section in the local config. Absent sections and directories are
    /// tolerated, but a name with no index entry at all is an error: it
    /// was never a dependency here.
    pub fn remove(&self, name: &str) -> Result<()> {
        log::info!("removing dependency {}", name);
        let section = submodule_section(name);

        if self.root().join(GITMODULES).exists() {
            if let SectionRemoval::AlreadyAbsent =
                self.git.config_remove_section(GITMODULES, &section)?
            {
                log::debug!("{} had no manifest section", name);
            }
            self.git.stage(&[GITMODULES])?;
        }

        // No index entry means the name was never added (or the remove
        // already completed); that failure is the caller's to see.
        self.git.rm_cached(name)?;
        remove_dir_if_present(&self.root().join(name))?;
        // Git keeps the submodule's repository under the parent's metadata
        // directory; stale identity data there makes a later add silently
        // reuse old object history.
        remove_dir_if_present(&self.root().join(".git/modules").join(name))?;

        if let SectionRemoval::AlreadyAbsent = self
            .git
            .config_remove_section(".git/config", &section)?
        {
            log::debug!("{} had no local config section", name);
        }
        Ok(())
    }

    /// Re-fetch every managed dependency to its pinned release. Per-module
    /// failures are collected, not fatal. `progress` is called before each
    /// module with (index, total, name).
    pub fn update_all(&self, mut progress: impl FnMut(usize, usize, &str)) -> Result<UpdateSummary> {
        let mut summary = UpdateSummary::default();
        let Some(manifest) = self.manifest()? else {
            return Ok(summary);
        };
        let modules = match manifest.managed(Some(KIND_DEPENDENCY)) {
            Listing::NoneManaged => return Ok(summary),
            Listing::Managed(modules) => modules,
        };

        let total = modules.len();
        for (index, (name, entry)) in modules.iter().enumerate() {
            progress(index + 1, total, name);
            match self.update_one(name, entry) {
                Ok(true) => summary.changed.push(name.clone()),
                Ok(false) => summary.unaffected.push(name.clone()),
                Err(e) => {
                    log::warn!("updating {} failed: {}", name, e);
                    summary.failed.push((name.clone(), e));
                }
            }
        }
        Ok(summary)
    }

    fn update_one(&self, name: &str, entry: &Submodule) -> Result<bool> {
        let version = entry.version().ok_or_else(|| Error::MissingMarker {
            name: name.to_string(),
            key: MDM_VERSION_KEY.to_string(),
        })?;
        let path = entry.path().unwrap_or(name);
        let before = self.git.in_dir(path).head_id();
        self.load(path, version, entry.url())?;
        let after = self.git.in_dir(path).head_id();

        // The parent's index pins the module to a commit of its own. When
        // that disagrees with the release just fetched, the working tree
        // and the recorded state have diverged and someone has to commit
        // (or reset) the parent to settle it.
        if let (Some(after), Ok(recorded)) = (&after, self.git.ls_files_stage(path)) {
            if let Some(recorded) = staged_object_id(&recorded) {
                if recorded != after.as_str() {
                    log::warn!(
                        "{} is at {} but the parent index records {}",
                        name,
                        after,
                        recorded
                    );
                }
            }
        }
        Ok(before != after)
    }

    /// Commit whatever the lifecycle operations staged. A [`CommitEnv`]
    /// makes the commit convergent across independent operators.
    pub fn commit_staged(&self, message: &str, env: Option<&CommitEnv>) -> Result<()> {
        self.git.commit(message, env)
    }
}

/// Fetch exactly one release branch into the module and check it out.
/// The module directory must be initialized with its remote configured.
///
/// The fetch lands in `FETCH_HEAD` rather than the branch ref directly:
/// after a previous add or load the release branch is the one checked
/// out, and git refuses to fetch into a checked-out branch. `checkout
/// -B` then settles the branch at the fetched commit either way, so the
/// operation converges when re-run.
fn fetch_release(module: &Git, version: &str) -> Result<()> {
    let branch = release_branch(version);
    module.fetch("origin", &branch)?;
    module.checkout_branch_at(&branch, "FETCH_HEAD")
}

/// The object id out of a `git ls-files -s` line
/// (`<mode> <object> <stage>\t<path>`), or `None` for empty output.
fn staged_object_id(output: &str) -> Option<&str> {
    output.split_whitespace().nth(1)
}

fn remove_dir_if_present(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => Ok(other?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_dir_if_present_tolerates_absence() {
        let temp = tempfile::tempdir().unwrap();
        remove_dir_if_present(&temp.path().join("nope")).unwrap();
    }

    #[test]
    fn test_remove_dir_if_present_removes() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("sub");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/file"), "x").unwrap();
        remove_dir_if_present(&dir).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_staged_object_id_parses_ls_files_line() {
        let line = "160000 2ae9a1e4e239689b5eb685a5c4e0e64c97a12a75 0\tlibfoo\n";
        assert_eq!(
            staged_object_id(line),
            Some("2ae9a1e4e239689b5eb685a5c4e0e64c97a12a75")
        );
        assert_eq!(staged_object_id(""), None);
    }

    #[test]
    fn test_update_summary_total() {
        let summary = UpdateSummary {
            changed: vec!["a".into()],
            unaffected: vec!["b".into(), "c".into()],
            failed: vec![],
        };
        assert_eq!(summary.total(), 3);
    }
}
