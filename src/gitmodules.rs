//! # Submodules Manifest
//!
//! Reader and query layer for `.gitmodules`, the manifest recording one
//! section per submodule. The file is git-config syntax, an INI dialect
//! with quoted section names (`[submodule "libfoo"]`) and
//! whitespace-indented keys, which `rust-ini` parses directly.
//!
//! A submodule is *managed* by mdm iff its section carries the `mdm`
//! marker key; the marker's value is the module kind. Queries can filter
//! by kind and by name.
//!
//! Three outcomes that git itself conflates are kept distinct here:
//! a manifest that does not exist ([`Manifest::load`] returns `Ok(None)`),
//! a manifest whose entries all fail the managed filter
//! ([`Listing::NoneManaged`]), and actual matches ([`Listing::Managed`]).
//! Writes to the manifest go through `git config -f` (see the lifecycle
//! operations); this module only reads.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ini::Ini;
use serde::Serialize;

use crate::defaults::{GITMODULES, MDM_KEY, MDM_VERSION_KEY};
use crate::error::{Error, Result};
use crate::git::Git;

/// One `[submodule "<name>"]` section: its keys and values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Submodule {
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
}

impl Submodule {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.get("url")
    }

    pub fn path(&self) -> Option<&str> {
        self.get("path")
    }

    /// The module kind from the `mdm` marker, if the entry is managed.
    pub fn kind(&self) -> Option<&str> {
        self.get(MDM_KEY)
    }

    /// The pinned release version from the `mdm-version` marker.
    pub fn version(&self) -> Option<&str> {
        self.get(MDM_VERSION_KEY)
    }

    pub fn is_managed(&self) -> bool {
        self.kind().is_some()
    }

    /// Managed, and of the requested kind when one is requested.
    pub fn matches(&self, kind: Option<&str>) -> bool {
        match (self.kind(), kind) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(have), Some(want)) => have == want,
        }
    }
}

/// Result of listing managed modules from a present manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Entries exist (or the file is empty), but none carry the marker or
    /// match the kind filter.
    NoneManaged,
    /// Managed entries, keyed by submodule name.
    Managed(BTreeMap<String, Submodule>),
}

/// The parsed submodules manifest: submodule name -> entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    modules: BTreeMap<String, Submodule>,
}

impl Manifest {
    /// Parse manifest text. `path` is only used to contextualize errors.
    pub fn parse(text: &str, path: &Path) -> Result<Manifest> {
        let ini = Ini::load_from_str(text).map_err(|e| Error::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut modules = BTreeMap::new();
        for (section, properties) in ini.iter() {
            let Some(name) = section.and_then(submodule_name) else {
                continue;
            };
            let mut entry = Submodule::default();
            for (key, value) in properties.iter() {
                entry.fields.insert(key.to_string(), value.to_string());
            }
            modules.insert(name.to_string(), entry);
        }
        Ok(Manifest { modules })
    }

    /// Load the manifest at `path`. A missing file is a normal steady
    /// state (a repository with no submodules yet) and returns `Ok(None)`;
    /// an unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Option<Manifest>> {
        let text = match fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            other => other?,
        };
        Self::parse(&text, path).map(Some)
    }

    /// Load the manifest of the working tree enclosing `git`'s directory.
    /// Failing to resolve a working tree at all is a distinct error from a
    /// tree that has no manifest.
    pub fn load_default(git: &Git) -> Result<Option<Manifest>> {
        let toplevel = git.rev_parse_toplevel()?;
        Self::load(&toplevel.join(GITMODULES))
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn modules(&self) -> &BTreeMap<String, Submodule> {
        &self.modules
    }

    /// All managed entries, optionally restricted to one kind. Entries
    /// failing the filter are excluded, not marked.
    pub fn managed(&self, kind: Option<&str>) -> Listing {
        let matched: BTreeMap<String, Submodule> = self
            .modules
            .iter()
            .filter(|(_, entry)| entry.matches(kind))
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect();
        if matched.is_empty() {
            Listing::NoneManaged
        } else {
            Listing::Managed(matched)
        }
    }

    /// A single managed entry by name. `None` when the entry is missing,
    /// carries no marker, or is of the wrong kind.
    pub fn managed_by_name(&self, name: &str, kind: Option<&str>) -> Option<&Submodule> {
        self.modules.get(name).filter(|entry| entry.matches(kind))
    }
}

/// Extract the submodule name from a section header. Handles both the
/// quoted form git writes (`submodule "libfoo"`) and an unquoted one.
fn submodule_name(section: &str) -> Option<&str> {
    let rest = section.strip_prefix("submodule")?.trim_start();
    let rest = rest.strip_prefix('"').unwrap_or(rest);
    let rest = rest.strip_suffix('"').unwrap_or(rest);
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
[submodule "libfoo"]
	path = libfoo
	url = https://example.invalid/libfoo.git
	mdm = dependency
	mdm-version = 2.0
	update = none
[submodule "plain"]
	path = plain
	url = https://example.invalid/plain.git
[submodule "docs"]
	path = docs
	url = https://example.invalid/docs.git
	mdm = releases
"#;

    fn manifest() -> Manifest {
        Manifest::parse(FIXTURE, Path::new(".gitmodules")).unwrap()
    }

    #[test]
    fn test_parse_reads_all_sections() {
        let m = manifest();
        assert_eq!(m.modules().len(), 3);
        let libfoo = &m.modules()["libfoo"];
        assert_eq!(libfoo.url(), Some("https://example.invalid/libfoo.git"));
        assert_eq!(libfoo.path(), Some("libfoo"));
        assert_eq!(libfoo.version(), Some("2.0"));
        assert_eq!(libfoo.get("update"), Some("none"));
    }

    #[test]
    fn test_unmarked_entry_is_not_managed() {
        let m = manifest();
        assert!(!m.modules()["plain"].is_managed());
        assert_eq!(m.managed_by_name("plain", None), None);
    }

    #[test]
    fn test_managed_by_name_kind_filter() {
        let m = manifest();
        // Matching kind returns the entry.
        let entry = m.managed_by_name("libfoo", Some("dependency")).unwrap();
        assert_eq!(entry.version(), Some("2.0"));
        // Mismatched kind is a miss even though the entry is managed.
        assert_eq!(m.managed_by_name("libfoo", Some("releases")), None);
        // Unknown name is a miss.
        assert_eq!(m.managed_by_name("nosuch", None), None);
    }

    #[test]
    fn test_managed_excludes_filtered_entries() {
        let m = manifest();
        match m.managed(None) {
            Listing::Managed(map) => {
                assert_eq!(map.len(), 2);
                assert!(map.contains_key("libfoo"));
                assert!(map.contains_key("docs"));
                assert!(!map.contains_key("plain"));
            }
            Listing::NoneManaged => panic!("expected managed entries"),
        }
    }

    #[test]
    fn test_managed_with_kind() {
        let m = manifest();
        match m.managed(Some("dependency")) {
            Listing::Managed(map) => {
                assert_eq!(map.keys().collect::<Vec<_>>(), vec!["libfoo"]);
            }
            Listing::NoneManaged => panic!("expected managed entries"),
        }
        assert_eq!(m.managed(Some("nosuchkind")), Listing::NoneManaged);
    }

    #[test]
    fn test_manifest_without_submodule_sections() {
        let m = Manifest::parse("[core]\n\tbare = false\n", Path::new(".gitmodules")).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.managed(None), Listing::NoneManaged);
        assert_eq!(m.managed_by_name("anything", None), None);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let temp = tempfile::tempdir().unwrap();
        let result = Manifest::load(&temp.path().join(".gitmodules")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_reads_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(".gitmodules");
        fs::write(&path, FIXTURE).unwrap();
        let m = Manifest::load(&path).unwrap().unwrap();
        assert_eq!(m.modules().len(), 3);
    }

    #[test]
    fn test_submodule_name_forms() {
        assert_eq!(submodule_name("submodule \"libfoo\""), Some("libfoo"));
        assert_eq!(submodule_name("submodule libfoo"), Some("libfoo"));
        assert_eq!(submodule_name("core"), None);
        assert_eq!(submodule_name("submodule"), None);
    }

    #[test]
    fn test_submodule_serializes_flat() {
        let m = manifest();
        let json = serde_json::to_string(&m.modules()["libfoo"]).unwrap();
        assert!(json.contains("\"mdm\":\"dependency\""));
        assert!(json.contains("\"mdm-version\":\"2.0\""));
    }
}
