//! # Error Handling
//!
//! Centralized error type for mdm operations, built with `thiserror`.
//!
//! The taxonomy mirrors how failures surface to a user of the tool:
//!
//! - **`NoWorkTree`**: no manifest path was given and the current directory
//!   is not inside a git working tree, so there is nothing to resolve
//!   against. Distinct from a manifest that simply does not exist, which is
//!   a normal steady state and not an error at all.
//! - **`ManifestParse`**: a manifest path was given (or resolved) and the
//!   file exists but could not be parsed.
//! - **`GitCommand`**: an invoked git command exited non-zero. Carries the
//!   command line and captured stderr; no cleanup of partial state is
//!   attempted by the caller.
//! - **`SourceUnreachable`**: `ls-remote` against a release source failed.
//!   Kept separate from an empty version list so callers can tell "nothing
//!   published" from "could not ask".
//! - **`MissingMarker`**: a managed module is missing a marker key an
//!   operation needs (e.g. `update` on an entry without `mdm-version`).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mdm operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No explicit manifest path was given and no enclosing git working
    /// tree could be resolved.
    #[error("not inside a git working tree: {message}")]
    NoWorkTree { message: String },

    /// The manifest file exists but is not valid git-config syntax.
    #[error("malformed manifest {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// An invoked git command exited non-zero.
    #[error("{command} failed: {stderr}")]
    GitCommand { command: String, stderr: String },

    /// A release source could not be queried for its published versions.
    #[error("cannot reach release source {source_location}: {stderr}")]
    SourceUnreachable {
        source_location: String,
        stderr: String,
    },

    /// A managed module lacks a marker key required by the operation.
    #[error("submodule {name} has no {key} marker in .gitmodules")]
    MissingMarker { name: String, key: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_no_work_tree() {
        let error = Error::NoWorkTree {
            message: "fatal: not a git repository".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("not inside a git working tree"));
        assert!(display.contains("fatal: not a git repository"));
    }

    #[test]
    fn test_error_display_manifest_parse() {
        let error = Error::ManifestParse {
            path: PathBuf::from("/repo/.gitmodules"),
            message: "unexpected token".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("malformed manifest"));
        assert!(display.contains("/repo/.gitmodules"));
        assert!(display.contains("unexpected token"));
    }

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "git fetch origin".to_string(),
            stderr: "couldn't find remote ref".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("git fetch origin failed"));
        assert!(display.contains("couldn't find remote ref"));
    }

    #[test]
    fn test_error_display_source_unreachable() {
        let error = Error::SourceUnreachable {
            source_location: "https://example.invalid/lib.git".to_string(),
            stderr: "could not resolve host".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("cannot reach release source"));
        assert!(display.contains("https://example.invalid/lib.git"));
    }

    #[test]
    fn test_error_display_missing_marker() {
        let error = Error::MissingMarker {
            name: "libfoo".to_string(),
            key: "mdm-version".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("libfoo"));
        assert!(display.contains("mdm-version"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("file not found"));
    }
}
