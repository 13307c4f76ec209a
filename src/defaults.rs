//! Naming conventions shared across commands.
//!
//! This module centralizes the fixed labels of the mdm convention: the
//! manifest filename, the marker keys written into it, and the reserved
//! branch namespace release repositories publish under.

/// Filename of the submodules manifest, relative to the repository root.
pub const GITMODULES: &str = ".gitmodules";

/// Marker key identifying a submodule as managed by mdm. Its value is the
/// module kind (currently always [`KIND_DEPENDENCY`]).
pub const MDM_KEY: &str = "mdm";

/// Marker key recording which release version a dependency is pinned to.
pub const MDM_VERSION_KEY: &str = "mdm-version";

/// Marker value for dependency-type modules.
pub const KIND_DEPENDENCY: &str = "dependency";

/// Branch a dependency's `origin` remote is restricted to auto-fetching.
/// Keeping the tracked namespace this narrow stops bulk commands like
/// `git pull` from dragging down unbounded history.
pub const INIT_BRANCH: &str = "mdm/init";

/// Branch name prefix under which releases are published.
pub const RELEASE_PREFIX: &str = "mdm/release/";

/// Ref pattern handed to `ls-remote` when enumerating published releases.
pub const RELEASE_REF_PATTERN: &str = "refs/heads/mdm/release/*";

/// Fully-qualified prefix stripped from `ls-remote` output lines.
pub const RELEASE_REF_PREFIX: &str = "refs/heads/mdm/release/";

/// Branch name carrying a given release version.
pub fn release_branch(version: &str) -> String {
    format!("{}{}", RELEASE_PREFIX, version)
}

/// Manifest section name for a submodule, in git-config dotted form.
pub fn submodule_section(name: &str) -> String {
    format!("submodule.{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_branch() {
        assert_eq!(release_branch("2.0"), "mdm/release/2.0");
    }

    #[test]
    fn test_ref_prefix_matches_pattern() {
        // The pattern and the strip prefix must describe the same namespace.
        assert_eq!(RELEASE_REF_PATTERN.trim_end_matches('*'), RELEASE_REF_PREFIX);
    }

    #[test]
    fn test_submodule_section() {
        assert_eq!(submodule_section("libfoo"), "submodule.libfoo");
    }
}
